//! Pagination and chunked mutations on top of the parallel dispatcher.
//!
//! Listings are read by probing the first page for the total, then fetching
//! every remaining page in parallel. Mutations over many IDs are split into
//! chunks that respect the API's per-request ceiling and the per-chunk
//! responses are merged back into one result.

use std::future::Future;

use serde_json::{Map, Value};
use tracing::{debug, info};

use webflow_core::error::WebflowError;
use webflow_core::types::{Page, PageDescriptor};
use webflow_core::utils::array_field;

use crate::dispatch::{collect_results, run_parallel, spawn_parallel};
use crate::WebflowResult;

/// Items requested per listing page
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Most IDs the API accepts in one publish/delete request
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Upper bound on the pages one listing may span
pub const MAX_LISTING_PAGES: u64 = 100_000;

/// Pages needed to cover `total` items: offsets `0, page_size, 2*page_size, ...`
/// strictly below `total`
pub fn page_offsets(total: u64, page_size: u64) -> Vec<PageDescriptor> {
    if page_size == 0 {
        return Vec::new();
    }

    (0..total)
        .step_by(usize::try_from(page_size).unwrap_or(usize::MAX))
        .map(|offset| PageDescriptor::new(offset, page_size))
        .collect()
}

/// Fetch every item of a paginated listing.
///
/// The offset-0 page is fetched first to learn the total and is kept as the
/// first page of the result; the other pages are fetched in parallel and
/// appended in ascending offset order. Items added or removed server-side
/// while collecting can make the result differ from `total`.
pub async fn collect_all<F, Fut>(fetch_page: F, page_size: u64, pool_size: usize) -> WebflowResult<Vec<Value>>
where
    F: Fn(PageDescriptor) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WebflowResult<Page>> + Send + 'static,
{
    if page_size == 0 {
        return Err(WebflowError::invalid_argument("page_size", "must be at least 1"));
    }
    if pool_size == 0 {
        return Err(WebflowError::invalid_argument("pool_size", "must be at least 1"));
    }

    let first_page = fetch_page(PageDescriptor::new(0, page_size)).await?;
    let total = first_page.total;
    if total == 0 {
        return Ok(Vec::new());
    }

    let page_count = total.div_ceil(page_size);
    if page_count > MAX_LISTING_PAGES {
        return Err(WebflowError::invalid_argument(
            "total",
            format!(
                "listing reports {} items, {} pages of {} exceed the limit of {} pages",
                total, page_count, page_size, MAX_LISTING_PAGES
            ),
        ));
    }

    let remaining: Vec<PageDescriptor> = page_offsets(total, page_size).into_iter().skip(1).collect();
    debug!(total, page_size, pages = remaining.len() + 1, "Collecting paginated listing");

    let pages = run_parallel(remaining, pool_size, fetch_page).await?;

    let mut items = first_page.items;
    items.extend(pages.into_iter().flat_map(|page| page.items));

    Ok(items)
}

/// Split IDs into consecutive chunks of at most `chunk_size`
pub fn chunk_ids(ids: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    ids.chunks(chunk_size.max(1)).map(<[String]>::to_vec).collect()
}

/// Concatenate the arrays stored under each of `keys` across all responses,
/// in response order. Responses missing a key contribute nothing to it.
pub fn merge_chunk_responses(responses: &[Value], keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .map(|key| {
            let merged: Vec<Value> = responses
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|response| array_field(response, key).iter().cloned())
                .collect();
            (key.to_string(), Value::Array(merged))
        })
        .collect()
}

/// Apply a mutation to many IDs, one parallel request per chunk, and merge
/// the chunk responses under `keys`.
///
/// No request is sent for an empty ID list. Partial failures the API reports
/// inside a successful response end up in the merged arrays; a chunk whose
/// request fails outright fails the whole call, and the error names the
/// chunk index.
pub async fn batched_mutation<F, Fut>(
    ids: Vec<String>,
    chunk_size: usize,
    pool_size: usize,
    keys: &[&str],
    send_chunk: F,
) -> WebflowResult<Map<String, Value>>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WebflowResult<Value>> + Send + 'static,
{
    if chunk_size == 0 {
        return Err(WebflowError::invalid_argument("chunk_size", "must be at least 1"));
    }

    let chunks = chunk_ids(&ids, chunk_size);
    if chunks.is_empty() {
        return Ok(merge_chunk_responses(&[], keys));
    }

    let chunk_count = chunks.len();
    let results = spawn_parallel(chunks, pool_size, send_chunk)?.join().await;
    let results = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.map_err(|e| e.with_chunk(index)))
        .collect();
    let responses = collect_results(results)?;

    info!(ids = ids.len(), chunks = chunk_count, "Batched mutation finished");
    Ok(merge_chunk_responses(&responses, keys))
}
