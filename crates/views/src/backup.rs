#![forbid(unsafe_code)]

use crate::domain::{Stage, StagedView};
use crate::error::Error;
use crate::pipeline::StagePipeline;
use crate::platform::ViewsPlatform;
use crate::selector::Selector;
use crate::storage::{BackupFolder, default_folder_name, sanitize_name};
use config::Config;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Saves every view on the platform into a new backup folder.
pub struct BackupWriter<'a> {
    config: &'a Config,
    platform: &'a dyn ViewsPlatform,
    selector: &'a dyn Selector,
}

impl<'a> BackupWriter<'a> {
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

    /// Back up all views, naming the folder after `timestamp` unless the
    /// operator picks another name.
    ///
    /// Stops at the first listing, mapping or write failure. Files already
    /// written are left in place.
    pub async fn run(&self, timestamp: &str, unattended: bool) -> Result<BackupFolder, Error> {
        let default_name = default_folder_name(timestamp);
        let name = if unattended {
            default_name
        } else {
            self.selector
                .prompt("Choose a name for this backup folder", &default_name)
        };
        let storage = &self.config.storage;
        let folder = BackupFolder::new(storage.root.join(&name), storage);
        let precompute = self.config.backup.precompute_hostname;

        folder.create(Stage::Original)?;
        if precompute {
            folder.create(Stage::Hostname)?;
        }

        let views = self.platform.list_views().await?;
        info!(count = views.len(), folder = %folder.path().display(), "backing up views");

        let mut pipeline =
            precompute.then(|| StagePipeline::new(self.platform, self.config.rewrite.unmatched));
        let mut seen = HashSet::new();

        for mut document in views {
            let base_name = sanitize_name(&document.name);
            if !seen.insert(base_name.clone()) {
                warn!(
                    view = %document.name,
                    file = %base_name,
                    "another view has the same file name, overwriting it"
                );
            }
            document.strip(&storage.strip_keys);

            let original = StagedView::new(Stage::Original, base_name, document);
            let path = folder.write(&original)?;
            debug!(view = %original.document.name, path = %path.display(), "view backed up");

            let Some(pipeline) = pipeline.as_mut() else {
                continue;
            };
            match pipeline.advance(&original).await {
                Ok(Some(hostname)) => {
                    let path = folder.write(&hostname)?;
                    debug!(
                        view = %hostname.document.name,
                        path = %path.display(),
                        "hostname copy written"
                    );
                }
                Ok(None) => {}
                // the original copy is enough to retry at restore time
                Err(err @ Error::UnmatchedIdentities { .. }) => {
                    warn!(view = %original.document.name, %err, "hostname copy skipped");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(folder)
    }
}
