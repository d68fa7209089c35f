#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Storage {
    /// Directory holding every backup folder.
    pub root: PathBuf,

    /// Subfolder for views keyed by their backup-time serial numbers.
    pub original_folder: String,

    /// Subfolder for views keyed by hostname.
    pub hostname_folder: String,

    /// Subfolder for views keyed by the serial numbers found at restore time.
    pub new_serial_folder: String,

    /// Server-assigned keys removed before a view is written or uploaded.
    pub strip_keys: Vec<String>,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            root: PathBuf::from("json"),
            original_folder: "w_original_sn".into(),
            hostname_folder: "w_hostname".into(),
            new_serial_folder: "w_new_sn".into(),
            strip_keys: ["savedAt", "favorite", "id", "userId", "username"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Backup {
    /// Also write the hostname-keyed copy of every view during backup.
    pub precompute_hostname: bool,
}

impl Default for Backup {
    fn default() -> Self {
        Self {
            precompute_hostname: true,
        }
    }
}
