//! Utility functions and helpers.
//!
//! Common functionality used across multiple webflow crates.

pub mod json;

// Re-export commonly used utilities
pub use json::{array_field, decode_json};
