//! Error types and result aliases for Webflow operations.
//!
//! Provides a unified error type that covers every failure a call against the
//! Webflow API can end in, from rate limiting to configuration mistakes.

use thiserror::Error;

/// Unified error type for all Webflow operations
#[derive(Error, Debug)]
pub enum WebflowError {
    // Transport errors
    #[error("HTTP {status} from {url}{}: {body}", chunk_suffix(.chunk))]
    Http {
        status: u16,
        url: String,
        body: String,
        /// Index of the ID chunk this request carried, for batched mutations
        chunk: Option<usize>,
    },

    #[error("Rate limit still hit on {url}{} after {attempts} attempts: {body}", chunk_suffix(.chunk))]
    RateLimitExhausted {
        url: String,
        attempts: u32,
        body: String,
        /// Index of the ID chunk this request carried, for batched mutations
        chunk: Option<usize>,
    },

    #[error("Failed to decode JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Caller errors
    #[error("No credential set; authenticate before calling the API")]
    AuthNotSet,

    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Item '{id}' was deleted and can no longer be used")]
    ItemDeleted { id: String },

    // Concurrency errors
    #[error("Unit of work #{index} did not complete: {message}")]
    Dispatch { index: usize, message: String },

    #[error("ID chunk #{chunk} failed: {source}")]
    ChunkFailed {
        chunk: usize,
        #[source]
        source: Box<WebflowError>,
    },

    #[error("{} of the dispatched calls failed; first failure (#{}): {}", .failures.len(), first_index(.failures), first_message(.failures))]
    Batch { failures: Vec<(usize, WebflowError)> },

    // Config errors
    #[error("Failed to parse webflow.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Webflow operations
pub type WebflowResult<T> = Result<T, WebflowError>;

fn chunk_suffix(chunk: &Option<usize>) -> String {
    match chunk {
        Some(index) => format!(" (chunk #{})", index),
        None => String::new(),
    }
}

fn first_index(failures: &[(usize, WebflowError)]) -> usize {
    failures.first().map(|(index, _)| *index).unwrap_or_default()
}

fn first_message(failures: &[(usize, WebflowError)]) -> String {
    failures
        .first()
        .map(|(_, error)| error.to_string())
        .unwrap_or_default()
}

impl WebflowError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status behind this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            WebflowError::Http { status, .. } => Some(*status),
            WebflowError::RateLimitExhausted { .. } => Some(429),
            WebflowError::ChunkFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Name the ID chunk whose request ended in this error.
    ///
    /// HTTP and rate-limit errors carry the index in their `chunk` field;
    /// any other failure is wrapped in `ChunkFailed`.
    pub fn with_chunk(self, index: usize) -> Self {
        match self {
            WebflowError::Http {
                status, url, body, ..
            } => WebflowError::Http {
                status,
                url,
                body,
                chunk: Some(index),
            },
            WebflowError::RateLimitExhausted {
                url, attempts, body, ..
            } => WebflowError::RateLimitExhausted {
                url,
                attempts,
                body,
                chunk: Some(index),
            },
            tagged @ WebflowError::ChunkFailed { .. } => tagged,
            other => WebflowError::ChunkFailed {
                chunk: index,
                source: Box::new(other),
            },
        }
    }

    /// Index of the ID chunk this error belongs to, if any
    pub fn chunk(&self) -> Option<usize> {
        match self {
            WebflowError::Http { chunk, .. } | WebflowError::RateLimitExhausted { chunk, .. } => *chunk,
            WebflowError::ChunkFailed { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        if let WebflowError::ChunkFailed { source, .. } = self {
            return source.is_recoverable();
        }
        matches!(
            self,
            WebflowError::Network { .. }
                | WebflowError::RateLimitExhausted { .. }
                | WebflowError::Io { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            WebflowError::AuthNotSet => {
                Some("Set WEBFLOW_API_TOKEN or add `token` under [api] in webflow.toml")
            },
            WebflowError::Http { status: 401, .. } | WebflowError::Http { status: 403, .. } => {
                Some("Check that the API token is valid and has access to this site")
            },
            WebflowError::Http { status: 404, .. } => {
                Some("Check the site, collection or item ID")
            },
            WebflowError::RateLimitExhausted { .. } => {
                Some("Raise retry.max_retries or lower concurrency.pool_size")
            },
            WebflowError::Network { .. } => Some("Check your internet connection and try again"),
            WebflowError::ItemDeleted { .. } => Some("Fetch a fresh handle for an existing item"),
            WebflowError::ChunkFailed { source, .. } => source.suggestion(),
            _ => None,
        }
    }
}
