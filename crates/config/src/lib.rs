#![forbid(unsafe_code)]

mod error;
mod platform;
mod rewrite_policy;
mod storage;

pub use error::Error;
pub use platform::Platform;
pub use rewrite_policy::{Rewrite, UnmatchedPolicy};
pub use storage::{Backup, Storage};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of the variables that override any key, e.g.
/// `MANAGE_VIEWS_STORAGE__ROOT=/srv/views`.
pub const ENV_PREFIX: &str = "MANAGE_VIEWS_";

/// Prefix of the platform connection variables (`IPF_URL`, `IPF_TOKEN`, ...).
pub const PLATFORM_ENV_PREFIX: &str = "IPF_";

/// Variable naming the storage root, kept for existing `.env` files.
pub const STORAGE_ROOT_ENV: &str = "FOLDER_JSON";

const PLATFORM_ENV_KEYS: &[&str] = &[
    "url",
    "token",
    "api_version",
    "verify",
    "snapshot_id",
    "timeout",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub platform: Platform,
    pub storage: Storage,
    pub backup: Backup,
    pub rewrite: Rewrite,
}

impl Config {
    /// Defaults overridden by the environment.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::figment(None).extract()?)
    }

    /// Defaults overridden by the TOML file at `path`, then by the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        Ok(Self::figment(Some(path)).extract()?)
    }

    /// Check the settings every remote call depends on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.platform.url.trim().is_empty() {
            return Err(Error::MissingSetting("platform.url"));
        }
        if self.platform.token.trim().is_empty() {
            return Err(Error::MissingSetting("platform.token"));
        }
        Ok(())
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(
                Env::prefixed(PLATFORM_ENV_PREFIX)
                    .only(PLATFORM_ENV_KEYS)
                    .map(|key| format!("platform.{key}").into()),
            )
            .merge(
                Env::raw()
                    .only(&[STORAGE_ROOT_ENV])
                    .map(|_| "storage.root".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
