//! HTTP request executor with connection pooling and rate-limit retry logic

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use tracing::{debug, warn};

use webflow_core::error::WebflowError;
use webflow_core::types::{HttpMethod, RequestDescriptor};
use webflow_core::utils::decode_json;
use crate::WebflowResult;

/// Status the API answers with when the request quota is exceeded
pub const RATE_LIMITED: u16 = 429;

/// Configuration for fixed-delay rate-limit retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after a 429 response
    pub max_retries: u32,
    /// Delay before each retry
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 50,
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// Retry bookkeeping for one in-flight call
#[derive(Debug, Clone, Copy)]
struct RetryState {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_retries,
            delay: policy.retry_delay,
        }
    }

    fn can_retry(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Requests sent so far, counting the one being handled
    fn requests_sent(&self) -> u32 {
        self.attempt + 1
    }
}

/// Status and raw body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and hands back the raw response, without any retry logic
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: &RequestDescriptor) -> WebflowResult<RawResponse>;
}

/// Transport backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with connection pooling
    pub fn new() -> WebflowResult<Self> {
        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            // Request timeout
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .user_agent(concat!("webflow-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WebflowError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> WebflowResult<RawResponse> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method()), request.url());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            WebflowError::network(format!("{} {} failed: {}", request.method(), request.url(), e), e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            WebflowError::network(format!("Failed to read response from {}: {}", request.url(), e), e)
        })?;

        Ok(RawResponse { status, body })
    }
}

/// Single chokepoint for API calls: retries rate-limited requests, decodes
/// successful bodies and turns every other status into an error
#[derive(Debug, Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Executor over a fresh reqwest transport
    pub fn with_policy(retry: RetryPolicy) -> WebflowResult<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new()?), retry))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Execute a request with this executor's retry policy
    pub async fn execute(&self, request: &RequestDescriptor) -> WebflowResult<Value> {
        self.execute_with(request, &self.retry).await
    }

    /// Execute a request, resending it unchanged after a fixed delay for as
    /// long as the API answers 429 and retries remain.
    pub async fn execute_with(&self, request: &RequestDescriptor, policy: &RetryPolicy) -> WebflowResult<Value> {
        let mut state = RetryState::new(policy);

        loop {
            debug!(
                method = %request.method(),
                url = request.url(),
                attempt = state.attempt,
                "Sending request"
            );
            let response = self.transport.send(request).await?;

            match response.status {
                RATE_LIMITED if state.can_retry() => {
                    warn!(
                        url = request.url(),
                        attempt = state.attempt,
                        max_retries = state.max_attempts,
                        delay_ms = state.delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(state.delay).await;
                    state.attempt += 1;
                }
                RATE_LIMITED => {
                    return Err(WebflowError::RateLimitExhausted {
                        url: request.url().to_string(),
                        attempts: state.requests_sent(),
                        body: response.body,
                        chunk: None,
                    });
                }
                204 => return Ok(Value::Null),
                status if (200..300).contains(&status) => {
                    return decode_json(request.url(), &response.body);
                }
                status => {
                    return Err(WebflowError::Http {
                        status,
                        url: request.url().to_string(),
                        body: response.body,
                        chunk: None,
                    });
                }
            }
        }
    }
}
