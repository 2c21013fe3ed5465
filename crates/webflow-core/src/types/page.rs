//! Pagination types for listing endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset/limit pair addressing one page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub offset: u64,
    pub limit: u64,
}

impl PageDescriptor {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// One page of items as returned by a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Item records of this page
    #[serde(default)]
    pub items: Vec<Value>,
    /// Number of items in the whole listing
    pub total: u64,
    /// Number of items in this page
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

impl Page {
    /// Decode a page from an already-parsed JSON response
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
