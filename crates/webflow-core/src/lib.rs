//! # webflow-core
//!
//! Core types and utilities shared across all webflow crates.
//!
//! This crate provides:
//! - Request descriptors, HTTP methods and credentials
//! - Page types for paginated listings
//! - WebflowError enum for unified error handling
//! - JSON helpers for API payloads
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (RequestDescriptor, Credential, Page, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{WebflowError, WebflowResult};
pub use types::{AuthProvider, Credential, HttpMethod, Page, PageDescriptor, RequestDescriptor};
