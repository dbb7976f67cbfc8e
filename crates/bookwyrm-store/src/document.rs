//! Document shape crossing the store boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document: an id plus a schemaless JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned (or caller-chosen) identifier
    pub id: String,

    /// Document payload
    pub data: Value,
}

impl Document {
    /// Pair an id with its payload.
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }
}
