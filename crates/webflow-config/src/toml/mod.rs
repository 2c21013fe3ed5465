//! webflow.toml parsing and validation

use serde::{Deserialize, Serialize};
use webflow_core::error::WebflowError;
use crate::ConfigResult;

/// Largest page and chunk size the Webflow API accepts
pub const API_MAX_LIMIT: u64 = 100;

/// Complete webflow.toml configuration.
///
/// Every setting is optional so that layers can be merged field by field;
/// unset fields fall back to the client defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebflowToml {
    /// API access
    #[serde(default)]
    pub api: ApiSection,

    /// Rate-limit retry behaviour
    #[serde(default)]
    pub retry: RetrySection,

    /// Parallel dispatch and pagination
    #[serde(default)]
    pub concurrency: ConcurrencySection,
}

/// `[api]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// API root URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// `[retry]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after a 429 before giving up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Fixed wait between attempts, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,
}

/// `[concurrency]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConcurrencySection {
    /// Simultaneous in-flight requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,

    /// Items per listing page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,

    /// IDs per bulk publish/delete request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items_per_request: Option<usize>,
}

/// Parse TOML string to WebflowToml configuration
pub fn parse_webflow_toml(content: &str) -> ConfigResult<WebflowToml> {
    let config: WebflowToml = ::toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        WebflowError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize WebflowToml to TOML string
pub fn serialize_webflow_toml(config: &WebflowToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config).map_err(|e| WebflowError::TomlParse {
        message: format!("TOML serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Validate value ranges
pub fn validate_config(config: &WebflowToml) -> ConfigResult<()> {
    if let Some(token) = &config.api.token {
        if token.trim().is_empty() {
            return Err(invalid("api.token", "must not be empty"));
        }
    }

    if let Some(base_url) = &config.api.base_url {
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(invalid(
                "api.base_url",
                format!("'{}' must start with http:// or https://", base_url),
            ));
        }
    }

    if config.concurrency.pool_size == Some(0) {
        return Err(invalid("concurrency.pool_size", "must be at least 1"));
    }

    if let Some(page_size) = config.concurrency.page_size {
        if page_size == 0 || page_size > API_MAX_LIMIT {
            return Err(invalid(
                "concurrency.page_size",
                format!("must be between 1 and {}", API_MAX_LIMIT),
            ));
        }
    }

    if let Some(max_items) = config.concurrency.max_items_per_request {
        if max_items == 0 || max_items as u64 > API_MAX_LIMIT {
            return Err(invalid(
                "concurrency.max_items_per_request",
                format!("must be between 1 and {}", API_MAX_LIMIT),
            ));
        }
    }

    Ok(())
}

/// Load and parse webflow.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<WebflowToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WebflowError::io(format!("Failed to read {}", path), e))?;

    parse_webflow_toml(&content).map_err(|e| match e {
        WebflowError::TomlParse { message, line, column } => WebflowError::TomlParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        WebflowError::ConfigValidation { field, reason } => WebflowError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })
}

pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> WebflowError {
    WebflowError::ConfigValidation {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let prefix = &content[..offset.min(content.len())];
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rfind('\n').map_or(prefix.len(), |newline| prefix.len() - newline - 1) + 1;
    (line, column)
}
