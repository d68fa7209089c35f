#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A saved view, as listed by and uploaded to `graphs/views`.
///
/// Only `name` and `positions` are interpreted. Every other field is kept
/// verbatim, in its original order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewDocument {
    pub name: String,

    /// Layout data keyed by device identity (serial number or hostname).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ViewDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions: None,
            fields: Map::new(),
        }
    }

    pub fn with_positions(mut self, positions: Map<String, Value>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Server-side id, whether the platform sends it as a string or a number.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Remove server-assigned fields that must not be replayed on create.
    pub fn strip<S: AsRef<str>>(&mut self, keys: &[S]) {
        self.fields
            .retain(|field, _| !keys.iter().any(|key| key.as_ref() == field));
    }

    pub fn position_keys(&self) -> impl Iterator<Item = &str> {
        self.positions
            .iter()
            .flat_map(|positions| positions.keys().map(String::as_str))
    }
}
