#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// What to do with a `positions` key that no mapping entry matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Keep the key as is and log at debug level.
    Keep,
    /// Keep the key as is and log a warning.
    #[default]
    Warn,
    /// Refuse to rewrite the view.
    Fail,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Rewrite {
    pub unmatched: UnmatchedPolicy,
}
