//! Collection handle: item listing, creation and bulk publish/delete

use serde_json::{Map, Value};
use tracing::debug;

use webflow_core::error::WebflowError;
use webflow_core::types::{HttpMethod, Page, PageDescriptor};

use crate::api::{DELETE_ITEMS_KEYS, PUBLISH_ITEMS_KEYS};
use crate::dispatch::run_parallel;
use crate::paginate::{batched_mutation, collect_all};
use crate::WebflowResult;
use super::{item_payload, WebflowClient};

/// A CMS collection
#[derive(Debug, Clone)]
pub struct Collection {
    client: WebflowClient,
    id: String,
}

impl Collection {
    pub(crate) fn new(client: WebflowClient, id: String) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection information (name, slug, fields, ...)
    pub async fn get_data(&self) -> WebflowResult<Value> {
        self.client.get(&self.client.urls().collection(&self.id)).await
    }

    /// Add one item, drafted or staged for publishing
    pub async fn post_item(&self, fields: Map<String, Value>, draft: bool) -> WebflowResult<Value> {
        self.client
            .request(
                HttpMethod::Post,
                &self.client.urls().collection_items(&self.id),
                Some(item_payload(fields, draft)),
            )
            .await
    }

    /// Add several items in parallel; results follow the input order
    pub async fn post_items(&self, fields_list: Vec<Map<String, Value>>, draft: bool) -> WebflowResult<Vec<Value>> {
        self.client.ensure_authenticated()?;
        let collection = self.clone();
        run_parallel(fields_list, self.client.options().pool_size, move |fields| {
            let collection = collection.clone();
            async move { collection.post_item(fields, draft).await }
        })
        .await
    }

    /// One page of items
    pub async fn get_items(&self, offset: u64, limit: u64) -> WebflowResult<Page> {
        fetch_page(&self.client, &self.id, PageDescriptor::new(offset, limit)).await
    }

    /// Every item of the collection, fetching pages in parallel
    pub async fn get_all_items(&self) -> WebflowResult<Vec<Value>> {
        let client = self.client.clone();
        let id = self.id.clone();
        let options = self.client.options();

        collect_all(
            move |page| {
                let client = client.clone();
                let id = id.clone();
                async move { fetch_page(&client, &id, page).await }
            },
            options.page_size,
            options.pool_size,
        )
        .await
    }

    /// Publish items already in the collection, in chunks the API accepts.
    ///
    /// Returns the merged `publishedItemIds` and `errors` arrays.
    pub async fn publish_items(&self, item_ids: Vec<String>) -> WebflowResult<Map<String, Value>> {
        self.bulk_mutation(HttpMethod::Put, self.client.urls().collection_publish(&self.id), item_ids, &PUBLISH_ITEMS_KEYS)
            .await
    }

    /// Delete items from the collection, in chunks the API accepts.
    ///
    /// Returns the merged `deletedItemIds` and `errors` arrays.
    pub async fn delete_items(&self, item_ids: Vec<String>) -> WebflowResult<Map<String, Value>> {
        self.bulk_mutation(HttpMethod::Delete, self.client.urls().collection_items(&self.id), item_ids, &DELETE_ITEMS_KEYS)
            .await
    }

    async fn bulk_mutation(
        &self,
        method: HttpMethod,
        url: String,
        item_ids: Vec<String>,
        keys: &[&str],
    ) -> WebflowResult<Map<String, Value>> {
        self.client.ensure_authenticated()?;
        let client = self.client.clone();
        let options = self.client.options();

        batched_mutation(item_ids, options.max_items_per_request, options.pool_size, keys, move |chunk| {
            let client = client.clone();
            let url = url.clone();
            async move {
                let body = serde_json::json!({ "itemIds": chunk });
                client.request(method, &url, Some(body)).await
            }
        })
        .await
    }
}

async fn fetch_page(client: &WebflowClient, collection_id: &str, page: PageDescriptor) -> WebflowResult<Page> {
    let url = client.urls().collection_items_page(collection_id, page);
    debug!(collection = collection_id, offset = page.offset, limit = page.limit, "Fetching items page");
    let value = client.get(&url).await?;
    Page::from_value(value).map_err(|source| WebflowError::Decode { url, source })
}
