#![forbid(unsafe_code)]

mod rest;

pub use rest::RestPlatform;

use crate::domain::{IdentityEntry, ViewDocument};
use crate::error::Error;
use async_trait::async_trait;

/// The remote calls the backup and restore flows depend on.
#[async_trait]
pub trait ViewsPlatform: Send + Sync {
    /// Every saved view, in one call.
    async fn list_views(&self) -> Result<Vec<ViewDocument>, Error>;

    async fn create_view(&self, view: &ViewDocument) -> Result<(), Error>;

    async fn delete_view(&self, id: &str) -> Result<(), Error>;

    /// Serial/hostname pairs seen over time, in source order. A serial may
    /// appear several times.
    async fn discovery_history(&self) -> Result<Vec<IdentityEntry>, Error>;

    /// Serial/hostname pairs of the devices in the current inventory.
    async fn inventory(&self) -> Result<Vec<IdentityEntry>, Error>;
}
