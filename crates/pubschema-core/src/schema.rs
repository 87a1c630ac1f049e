//! # Schema Documents
//!
//! Schemas and generated documents are arbitrary JSON trees, so both are
//! carried as `serde_json::Value`. `Schema` wraps the value to make it
//! clear which side of the pipeline a tree belongs to and to keep it
//! immutable: there is no `&mut` accessor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generated (or customised) document.
pub type Document = Value;

/// A parsed JSON Schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Value);

impl Schema {
    /// Wrap an already-parsed schema.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a schema from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self)
    }

    /// Borrow the underlying JSON tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the schema, returning the underlying JSON tree.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `$schema` draft URI, if the document declares one.
    pub fn draft_uri(&self) -> Option<&str> {
        self.0.get("$schema").and_then(Value::as_str)
    }
}

impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl AsRef<Value> for Schema {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}
