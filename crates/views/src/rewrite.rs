#![forbid(unsafe_code)]

use crate::domain::{IdentityMapping, StagedView};
use crate::error::Error;
use config::UnmatchedPolicy;
use serde_json::Map;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub view: StagedView,
    /// `positions` keys no mapping entry matched, left as they were.
    pub unmatched: Vec<String>,
}

/// Rename the device keys of `view.positions` through `mapping`.
///
/// Matched keys are replaced in place, values and key order are kept, and
/// unmatched keys pass through unchanged unless `policy` is
/// [`UnmatchedPolicy::Fail`]. The result is one stage further along (never
/// behind where `view` already is). Nothing is written to disk.
pub fn rewrite(
    view: &StagedView,
    mapping: &IdentityMapping,
    policy: UnmatchedPolicy,
) -> Result<Rewritten, Error> {
    let name = &view.document.name;
    let mut document = view.document.clone();
    let mut unmatched = Vec::new();

    if let Some(positions) = document.positions.take() {
        let mut renamed = Map::new();
        for (key, value) in positions {
            let key = match mapping.get(&key) {
                Some(destination) => destination.to_owned(),
                None => {
                    unmatched.push(key.clone());
                    key
                }
            };
            if renamed.insert(key.clone(), value).is_some() {
                warn!(view = %name, %key, "two devices map to the same key, keeping the last one");
            }
        }
        document.positions = Some(renamed);
    }

    if !unmatched.is_empty() {
        match policy {
            UnmatchedPolicy::Keep => {
                debug!(
                    view = %name,
                    ?unmatched,
                    direction = ?mapping.direction(),
                    "devices kept unmapped"
                );
            }
            UnmatchedPolicy::Warn => {
                warn!(
                    view = %name,
                    ?unmatched,
                    direction = ?mapping.direction(),
                    "devices kept unmapped"
                );
            }
            UnmatchedPolicy::Fail => {
                return Err(Error::UnmatchedIdentities {
                    view: name.clone(),
                    keys: unmatched,
                });
            }
        }
    }

    let stage = view.stage.max(mapping.direction().target());
    Ok(Rewritten {
        view: StagedView::new(stage, view.base_name.clone(), document),
        unmatched,
    })
}
