use crate::cli::{Command, RestoreArgs};
use crate::error::Error;
use config::Config;
use tracing::{error, info, warn};
use views::{
    BackupFolder, BackupWriter, BatchReport, PresetSelector, Restorer, Scope, Selector,
    ViewsPlatform,
};

/// Runs one command against the platform.
pub struct App<'a> {
    config: &'a Config,
    platform: &'a dyn ViewsPlatform,
    selector: &'a dyn Selector,
    unattended: bool,
}

impl<'a> App<'a> {
    pub fn new(
        config: &'a Config,
        platform: &'a dyn ViewsPlatform,
        selector: &'a dyn Selector,
        unattended: bool,
    ) -> Self {
        Self {
            config,
            platform,
            selector,
            unattended,
        }
    }

    /// `timestamp` names the backup folder of `backup` and `do-all`.
    ///
    /// An empty selection or a declined confirmation ends the command
    /// early without an error.
    pub async fn run(&self, command: &Command, timestamp: &str) -> Result<(), Error> {
        match command {
            Command::Backup => self.backup(timestamp).await.map(|_| ()),
            Command::Restore(args) => self.restore(args).await,
            Command::Delete => self.delete(self.selector).await.map(|_| ()),
            Command::DoAll => self.do_all(timestamp).await,
        }
    }

    async fn backup(&self, timestamp: &str) -> Result<BackupFolder, Error> {
        let writer = BackupWriter::new(self.config, self.platform, self.selector);
        match writer.run(timestamp, self.unattended).await {
            Ok(folder) => {
                info!(folder = %folder.path().display(), "Backup completed successfully");
                Ok(folder)
            }
            Err(err) => {
                error!(%err, "Backup failed");
                Err(err.into())
            }
        }
    }

    async fn restore(&self, args: &RestoreArgs) -> Result<(), Error> {
        let scope = match (args.single_file, args.all_files) {
            (true, false) => Scope::Single,
            (false, true) => Scope::All,
            _ => {
                warn!(
                    "None or both option(s) selected. \
                     Please select either --single-file or --all-files"
                );
                return Ok(());
            }
        };
        self.restore_with(scope, self.selector).await
    }

    async fn restore_with(&self, scope: Scope, selector: &dyn Selector) -> Result<(), Error> {
        let restorer = Restorer::new(self.config, self.platform, selector);
        match restorer.restore(scope, self.unattended).await {
            Ok(report) => {
                summarize("Restore", &report);
                Ok(())
            }
            Err(views::Error::NothingToRestore) => {
                warn!("Nothing to restore");
                Ok(())
            }
            Err(err) => {
                error!(%err, "Restore failed");
                Err(err.into())
            }
        }
    }

    /// `Ok(false)` when the operator declined.
    async fn delete(&self, selector: &dyn Selector) -> Result<bool, Error> {
        let restorer = Restorer::new(self.config, self.platform, selector);
        match restorer.delete_all(self.unattended).await {
            Ok(report) => {
                summarize("Delete", &report);
                Ok(true)
            }
            Err(views::Error::Declined) => {
                warn!("Delete aborted");
                Ok(false)
            }
            Err(err) => {
                error!(%err, "Delete failed");
                Err(err.into())
            }
        }
    }

    /// Nothing is deleted unless the backup succeeded, and the restore
    /// reads the backup that was just written.
    async fn do_all(&self, timestamp: &str) -> Result<(), Error> {
        let folder = self.backup(timestamp).await?;
        if !self.delete(self.selector).await? {
            return Ok(());
        }
        let selector = PresetSelector::unattended().with_folder(Some(folder.path().to_owned()));
        self.restore_with(Scope::All, &selector).await
    }
}

fn summarize(action: &str, report: &BatchReport) {
    if report.is_success() {
        info!(views = report.succeeded.len(), "{action} completed successfully");
    } else {
        for failure in &report.failures {
            warn!(item = %failure.item, reason = %failure.reason, "{action} failed for item");
        }
        warn!(
            succeeded = report.succeeded.len(),
            failed = report.failures.len(),
            "{action} completed with failures"
        );
    }
}
