//! Authenticated client and handles for sites, collections and items.
//!
//! Every call builds a request descriptor from the endpoint URL, the
//! credential headers and an optional JSON payload, then hands it to the
//! executor (single calls) or to the collector (listings, bulk mutations).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

use webflow_core::error::WebflowError;
use webflow_core::types::{AuthProvider, Credential, HttpMethod, RequestDescriptor};

use crate::api::{ApiUrls, User, UserResponse, DEFAULT_BASE_URL};
use crate::client::{Executor, ReqwestTransport, RetryPolicy, Transport};
use crate::dispatch::DEFAULT_POOL_SIZE;
use crate::paginate::{DEFAULT_PAGE_SIZE, MAX_ITEMS_PER_REQUEST};
use crate::WebflowResult;

pub mod collection;
pub mod item;
pub mod site;

pub use collection::Collection;
pub use item::{Item, Lifecycle};
pub use site::Site;

/// Tunables for a client instance
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// API root, without trailing slash
    pub base_url: String,
    /// Rate-limit retry behaviour of every call
    pub retry: RetryPolicy,
    /// Concurrent calls for parallel operations
    pub pool_size: usize,
    /// Items per page when collecting a listing
    pub page_size: u64,
    /// IDs per bulk publish/delete request
    pub max_items_per_request: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            pool_size: DEFAULT_POOL_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            max_items_per_request: MAX_ITEMS_PER_REQUEST,
        }
    }
}

/// Entry point of the library.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct WebflowClient {
    executor: Executor,
    credential: Option<Credential>,
    urls: ApiUrls,
    options: ClientOptions,
}

impl WebflowClient {
    /// Create an unauthenticated client backed by reqwest
    pub fn new(options: ClientOptions) -> WebflowResult<Self> {
        Self::with_transport(Arc::new(ReqwestTransport::new()?), options)
    }

    /// Create an unauthenticated client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>, options: ClientOptions) -> WebflowResult<Self> {
        if options.pool_size == 0 {
            return Err(WebflowError::invalid_argument("pool_size", "must be at least 1"));
        }
        if options.page_size == 0 {
            return Err(WebflowError::invalid_argument("page_size", "must be at least 1"));
        }
        if options.max_items_per_request == 0 {
            return Err(WebflowError::invalid_argument("max_items_per_request", "must be at least 1"));
        }

        Ok(Self {
            executor: Executor::new(transport, options.retry),
            credential: None,
            urls: ApiUrls::new(&options.base_url)?,
            options,
        })
    }

    /// Attach a credential without checking it against the API
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Validate a token against the API and return a client that uses it.
    ///
    /// Fails with the API's error if the token is rejected.
    pub async fn authenticate(&self, token: &str) -> WebflowResult<Self> {
        let client = self.clone().with_credential(Credential::new(token)?);
        let user = client.current_user().await?;
        info!(user = %user.display_name(), "Authenticated successfully");
        Ok(client)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fails with `AuthNotSet` when no credential is attached
    pub(crate) fn ensure_authenticated(&self) -> WebflowResult<()> {
        self.credential.auth_headers().map(|_| ())
    }

    /// Send one API call. Fails with `AuthNotSet` before any I/O when no
    /// credential is attached.
    pub async fn request(&self, method: HttpMethod, url: &str, body: Option<Value>) -> WebflowResult<Value> {
        let headers = self.credential.auth_headers()?;
        let mut request = RequestDescriptor::new(method, url)?.with_headers(headers);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.executor.execute(&request).await
    }

    pub async fn get(&self, url: &str) -> WebflowResult<Value> {
        self.request(HttpMethod::Get, url, None).await
    }

    /// GET and decode into a typed response
    pub(crate) async fn get_as<T: DeserializeOwned>(&self, url: &str) -> WebflowResult<T> {
        let value = self.get(url).await?;
        decode_value(url, value)
    }

    /// Account that owns the credential
    pub async fn current_user(&self) -> WebflowResult<User> {
        let response: UserResponse = self.get_as(&self.urls.user()).await?;
        Ok(response.user)
    }

    /// Every site the credential can access
    pub async fn list_sites(&self) -> WebflowResult<Vec<Value>> {
        self.get_as(&self.urls.sites()).await
    }

    pub fn site(&self, site_id: impl Into<String>) -> Site {
        Site::new(self.clone(), site_id.into())
    }

    pub fn collection(&self, collection_id: impl Into<String>) -> Collection {
        Collection::new(self.clone(), collection_id.into())
    }

    pub fn item(&self, collection_id: impl Into<String>, item_id: impl Into<String>) -> Item {
        Item::new(self.clone(), collection_id.into(), item_id.into())
    }
}

pub(crate) fn decode_value<T: DeserializeOwned>(url: &str, value: Value) -> WebflowResult<T> {
    serde_json::from_value(value).map_err(|source| WebflowError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Item body as the API expects it: `fields` with the archive and draft
/// flags, which explicit entries in `fields` override
pub fn item_payload(fields: Map<String, Value>, draft: bool) -> Value {
    let mut payload = Map::new();
    payload.insert("_archived".to_string(), Value::Bool(false));
    payload.insert("_draft".to_string(), Value::Bool(draft));
    payload.extend(fields);

    let mut body = Map::new();
    body.insert("fields".to_string(), Value::Object(payload));
    Value::Object(body)
}

#[cfg(test)]
mod tests;
