//! Configuration loading for the Webflow CMS client
//!
//! This crate handles parsing and validation of webflow.toml files and the
//! layering of global, project, environment and command-line settings.

pub mod toml;
pub mod merge;

// Re-export main types
pub use self::toml::{ApiSection, ConcurrencySection, RetrySection, WebflowToml};
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};

use webflow_core::error::WebflowError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, WebflowError>;

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "webflow.toml";
