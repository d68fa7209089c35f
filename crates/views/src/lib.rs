#![forbid(unsafe_code)]

//! Backup and restore of platform views, with device references rewritten
//! between original serial numbers, hostnames and current serial numbers.

pub mod backup;
pub mod domain;
mod error;
pub mod mapper;
pub mod pipeline;
pub mod platform;
mod report;
pub mod restore;
pub mod rewrite;
pub mod selector;
pub mod storage;

pub use backup::BackupWriter;
pub use error::Error;
pub use pipeline::StagePipeline;
pub use platform::{RestPlatform, ViewsPlatform};
pub use report::{BatchReport, Failure};
pub use restore::{Restorer, Scope};
pub use selector::{PresetSelector, Selector};
pub use storage::BackupFolder;
