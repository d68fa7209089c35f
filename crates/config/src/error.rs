#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to extract configuration: {0}")]
    Figment(Box<figment::Error>),

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}
