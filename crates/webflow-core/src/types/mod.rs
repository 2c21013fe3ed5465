//! Core data types for talking to the Webflow API.
//!
//! This module provides the transient structures the client works with:
//! - Request descriptors and HTTP methods
//! - Credentials and the auth header capability
//! - Page descriptors and listing pages

pub mod credential;
pub mod page;
pub mod request;

// Re-export all public types
pub use credential::{AuthProvider, Credential};
pub use page::{Page, PageDescriptor};
pub use request::{HttpMethod, RequestDescriptor};
