#![forbid(unsafe_code)]

use crate::domain::{Direction, IdentityEntry, IdentityMapping};
use crate::error::Error;
use crate::platform::ViewsPlatform;
use tracing::debug;

/// Resolves serial number/hostname correspondences.
///
/// Discovery history feeds [`Direction::SerialToHostname`], the current
/// inventory feeds [`Direction::HostnameToSerial`]. Each source is fetched
/// at most once per mapper.
pub struct IdentityMapper<'a> {
    platform: &'a dyn ViewsPlatform,
    historical: Option<IdentityMapping>,
    current: Option<IdentityMapping>,
}

impl<'a> IdentityMapper<'a> {
    pub fn new(platform: &'a dyn ViewsPlatform) -> Self {
        Self {
            platform,
            historical: None,
            current: None,
        }
    }

    pub async fn historical_mapping(&self) -> Result<Vec<IdentityEntry>, Error> {
        self.platform.discovery_history().await
    }

    pub async fn current_mapping(&self) -> Result<Vec<IdentityEntry>, Error> {
        self.platform.inventory().await
    }

    /// The lookup table for `direction`, fetched on first use.
    pub async fn mapping(&mut self, direction: Direction) -> Result<&IdentityMapping, Error> {
        let cached = match direction {
            Direction::SerialToHostname => self.historical.take(),
            Direction::HostnameToSerial => self.current.take(),
        };
        let mapping = match cached {
            Some(mapping) => mapping,
            None => {
                let entries = match direction {
                    Direction::SerialToHostname => self.historical_mapping().await?,
                    Direction::HostnameToSerial => self.current_mapping().await?,
                };
                let mapping = IdentityMapping::new(direction, &entries);
                debug!(
                    ?direction,
                    entries = entries.len(),
                    keys = mapping.len(),
                    "identity mapping fetched"
                );
                mapping
            }
        };
        let slot = match direction {
            Direction::SerialToHostname => &mut self.historical,
            Direction::HostnameToSerial => &mut self.current,
        };
        Ok(slot.insert(mapping))
    }
}
