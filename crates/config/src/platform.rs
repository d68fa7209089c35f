#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{fmt, time::Duration};

#[serde_as]
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Platform {
    /// Base URL of the platform, without the `/api/<version>` part.
    pub url: String,

    /// API token sent in the `X-API-Token` header.
    pub token: String,

    pub api_version: String,

    /// Verify the server's TLS certificate.
    pub verify: bool,

    /// Snapshot queried for the current inventory.
    pub snapshot_id: String,

    /// Timeout applied to every request, in seconds.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub timeout: Duration,

    /// Exact status a create call must return. Any 2xx when unset.
    pub create_status: Option<u16>,

    /// Exact status a delete call must return. Any 2xx when unset.
    pub delete_status: Option<u16>,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            api_version: "v6.0".into(),
            verify: true,
            snapshot_id: "$last".into(),
            timeout: Duration::from_secs(30),
            create_status: None,
            delete_status: None,
        }
    }
}

// keeps the token out of debug logs
impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("verify", &self.verify)
            .field("snapshot_id", &self.snapshot_id)
            .field("timeout", &self.timeout)
            .field("create_status", &self.create_status)
            .field("delete_status", &self.delete_status)
            .finish()
    }
}
