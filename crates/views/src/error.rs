#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network, TLS, timeout or decoding failure talking to the platform.
    #[error("platform request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("{action} returned status {status}: {body}")]
    UnexpectedStatus {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("API token is not a valid header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid view JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("view `{view}` has devices missing from the mapping: {}", .keys.join(", "))]
    UnmatchedIdentities { view: String, keys: Vec<String> },

    #[error("view `{0}` has no id")]
    MissingViewId(String),

    #[error("nothing to restore")]
    NothingToRestore,

    #[error("operation declined")]
    Declined,

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),
}

impl Error {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> Self + '_ {
        move |source| Self::Json {
            path: path.to_owned(),
            source,
        }
    }
}
