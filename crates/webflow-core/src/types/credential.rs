//! API credentials and the headers derived from them.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{WebflowError, WebflowResult};

/// Source of the headers that authorize a request.
///
/// Implementations must fail with [`WebflowError::AuthNotSet`] when no
/// credential has been established, before any network I/O happens.
pub trait AuthProvider: Send + Sync {
    fn auth_headers(&self) -> WebflowResult<BTreeMap<String, String>>;
}

/// Immutable API token produced by an authenticate step
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap a raw API token. Blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> WebflowResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(WebflowError::invalid_argument("token", "API token must not be empty"));
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"<redacted>").finish()
    }
}

impl AuthProvider for Credential {
    fn auth_headers(&self) -> WebflowResult<BTreeMap<String, String>> {
        Ok(BTreeMap::from([
            ("accept".to_string(), "application/json".to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            ("authorization".to_string(), format!("Bearer {}", self.token)),
        ]))
    }
}

impl AuthProvider for Option<Credential> {
    fn auth_headers(&self) -> WebflowResult<BTreeMap<String, String>> {
        match self {
            Some(credential) => credential.auth_headers(),
            None => Err(WebflowError::AuthNotSet),
        }
    }
}
