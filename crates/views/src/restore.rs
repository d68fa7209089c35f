#![forbid(unsafe_code)]

use crate::domain::ViewDocument;
use crate::error::Error;
use crate::pipeline::StagePipeline;
use crate::platform::ViewsPlatform;
use crate::report::BatchReport;
use crate::selector::Selector;
use crate::storage::{self, BackupFolder};
use config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One view file, picked from everything under the storage root.
    Single,
    /// Every view of one backup folder.
    All,
}

/// Re-creates saved views on the platform and clears existing ones.
pub struct Restorer<'a> {
    config: &'a Config,
    platform: &'a dyn ViewsPlatform,
    selector: &'a dyn Selector,
}

impl<'a> Restorer<'a> {
    pub fn new(
        config: &'a Config,
        platform: &'a dyn ViewsPlatform,
        selector: &'a dyn Selector,
    ) -> Self {
        Self {
            config,
            platform,
            selector,
        }
    }

    /// Restore the selected view files.
    ///
    /// Each file is moved to the new-serial stage, with every intermediate
    /// copy written next to the backup, and then created on the platform.
    /// A failing file is logged and recorded; the others still go through.
    pub async fn restore(&self, scope: Scope, unattended: bool) -> Result<BatchReport, Error> {
        let files: Vec<PathBuf> = match scope {
            Scope::Single => self.select_file()?.into_iter().collect(),
            Scope::All => self.select_folder_files()?,
        };
        if files.is_empty() {
            warn!(
                root = %self.config.storage.root.display(),
                "no view files found, nothing to restore"
            );
            return Err(Error::NothingToRestore);
        }

        let ask_name = scope == Scope::Single && !unattended;
        let mut pipeline = StagePipeline::new(self.platform, self.config.rewrite.unmatched);
        let mut report = BatchReport::default();

        for file in files {
            match self.restore_file(&mut pipeline, &file, ask_name).await {
                Ok(name) => report.succeeded.push(name),
                Err(err) => {
                    error!(path = %file.display(), %err, "view not restored");
                    report.fail(file.display().to_string(), &err);
                }
            }
        }
        Ok(report)
    }

    /// Delete every view on the platform, one call per view.
    pub async fn delete_all(&self, unattended: bool) -> Result<BatchReport, Error> {
        if !unattended
            && !self
                .selector
                .confirm("Are you sure you want to delete all existing views?")
        {
            warn!("deletion of views aborted");
            return Err(Error::Declined);
        }

        let views = self.platform.list_views().await?;
        let mut report = BatchReport::default();
        for view in views {
            let Some(id) = view.id() else {
                let err = Error::MissingViewId(view.name.clone());
                error!(view = %view.name, %err, "view not deleted");
                report.fail(view.name, &err);
                continue;
            };
            match self.platform.delete_view(&id).await {
                Ok(()) => {
                    info!(view = %view.name, %id, "view deleted");
                    report.succeeded.push(view.name);
                }
                Err(err) => {
                    error!(view = %view.name, %id, %err, "view not deleted");
                    report.fail(view.name, &err);
                }
            }
        }
        Ok(report)
    }

    fn select_file(&self) -> Result<Option<PathBuf>, Error> {
        let candidates = storage::find_view_files(&self.config.storage.root)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(self.selector.select_file(&candidates))
    }

    fn select_folder_files(&self) -> Result<Vec<PathBuf>, Error> {
        let storage = &self.config.storage;
        let candidates: Vec<PathBuf> = storage::find_backup_folders(storage)?
            .into_iter()
            .map(|folder| folder.path().to_owned())
            .collect();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let Some(selected) = self.selector.select_folder(&candidates) else {
            return Ok(Vec::new());
        };
        let folder = BackupFolder::open(&selected, storage);
        info!(folder = %folder.path().display(), "restoring backup folder");
        folder.restore_sources()
    }

    async fn restore_file(
        &self,
        pipeline: &mut StagePipeline<'_>,
        path: &Path,
        ask_name: bool,
    ) -> Result<String, Error> {
        let folder = BackupFolder::containing(path, &self.config.storage);
        let view = match &folder {
            Some(folder) => folder.read(path)?,
            None => storage::read_view(path)?,
        };
        debug!(
            path = %path.display(),
            stage = %view.stage,
            base = %view.base_name,
            "view file read"
        );

        let dir = path.parent().unwrap_or(Path::new("."));
        let view = pipeline
            .drive(view, |next| {
                let written = match &folder {
                    Some(folder) => folder.write(next)?,
                    None => storage::write_view(dir, next)?,
                };
                debug!(path = %written.display(), stage = %next.stage, "converted view written");
                Ok(())
            })
            .await?;

        self.create(view.document, ask_name).await
    }

    async fn create(&self, mut document: ViewDocument, ask_name: bool) -> Result<String, Error> {
        document.strip(&self.config.storage.strip_keys);
        if ask_name {
            document.name = self
                .selector
                .prompt("Choose a name for this view", &document.name);
        }
        match self.platform.create_view(&document).await {
            Ok(()) => {
                info!(view = %document.name, "view created");
                Ok(document.name)
            }
            Err(err) => {
                error!(view = %document.name, %err, "view not created");
                Err(err)
            }
        }
    }
}
