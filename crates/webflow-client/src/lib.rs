//! Webflow CMS API client
//!
//! This crate provides HTTP client functionality for the Webflow sites,
//! collections and items endpoints with connection pooling, rate-limit retry
//! logic, parallel pagination and chunked bulk mutations.

pub mod client;
pub mod dispatch;
pub mod paginate;
pub mod api;
pub mod resources;

#[cfg(test)]
mod testing;

// Re-export main types
pub use client::{Executor, RawResponse, ReqwestTransport, RetryPolicy, Transport};
pub use dispatch::{collect_results, run_parallel, spawn_parallel, PendingBatch, DEFAULT_POOL_SIZE};
pub use paginate::{batched_mutation, chunk_ids, collect_all, merge_chunk_responses, page_offsets};
pub use api::{ApiUrls, Domain, User, DEFAULT_BASE_URL};
pub use resources::{ClientOptions, Collection, Item, Lifecycle, Site, WebflowClient};

pub use webflow_core::error::WebflowResult;
