//! Request descriptor types.
//!
//! A descriptor captures everything needed to send one HTTP call, so a retry
//! can resend exactly the same request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WebflowError, WebflowResult};

/// HTTP methods accepted by the Webflow API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully-described HTTP call: method, target, headers and optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: String,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl RequestDescriptor {
    /// Create a descriptor with no headers and no body
    pub fn new(method: HttpMethod, url: impl Into<String>) -> WebflowResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(WebflowError::invalid_argument("url", "request URL must not be empty"));
        }

        Ok(Self {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
        })
    }

    /// Add a single header, replacing any previous value for the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Add every header of the mapping
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.to_ascii_lowercase(), value);
        }
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_url_rejected() {
        let result = RequestDescriptor::new(HttpMethod::Get, "  ");
        assert!(matches!(result, Err(WebflowError::InvalidArgument { ref field, .. }) if field == "url"));
    }

    #[test]
    fn test_builder() {
        let request = RequestDescriptor::new(HttpMethod::Put, "https://api.webflow.com/x")
            .unwrap()
            .with_header("Authorization", "Bearer abc")
            .with_body(json!({"itemIds": ["a"]}));

        assert_eq!(request.method(), HttpMethod::Put);
        assert_eq!(request.url(), "https://api.webflow.com/x");
        assert_eq!(request.headers().get("authorization").unwrap(), "Bearer abc");
        assert_eq!(request.body(), Some(&json!({"itemIds": ["a"]})));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
