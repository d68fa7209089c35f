#![forbid(unsafe_code)]

use super::Stage;
use std::collections::HashMap;

/// One serial number/hostname pair reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityEntry {
    pub serial: String,
    pub hostname: String,
}

impl IdentityEntry {
    pub fn new(serial: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            hostname: hostname.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    SerialToHostname,
    HostnameToSerial,
}

impl Direction {
    /// Stage a view reaches once rewritten in this direction.
    pub fn target(self) -> Stage {
        match self {
            Direction::SerialToHostname => Stage::Hostname,
            Direction::HostnameToSerial => Stage::NewSerial,
        }
    }

    fn split(self, entry: &IdentityEntry) -> (&str, &str) {
        match self {
            Direction::SerialToHostname => (&entry.serial, &entry.hostname),
            Direction::HostnameToSerial => (&entry.hostname, &entry.serial),
        }
    }
}

/// Lookup table from one identity namespace to the other.
///
/// Built from entries in source order: when several entries share a source
/// key, the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMapping {
    direction: Direction,
    table: HashMap<String, String>,
}

impl IdentityMapping {
    pub fn new<'a>(
        direction: Direction,
        entries: impl IntoIterator<Item = &'a IdentityEntry>,
    ) -> Self {
        let table = entries
            .into_iter()
            .map(|entry| {
                let (source, destination) = direction.split(entry);
                (source.to_owned(), destination.to_owned())
            })
            .collect();
        Self { direction, table }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
