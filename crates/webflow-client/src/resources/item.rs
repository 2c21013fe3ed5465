//! Item handle with an explicit lifecycle.
//!
//! Once `delete` succeeds the handle is tagged `Deleted` and every further
//! call fails with `ItemDeleted` without reaching the network. Handles are
//! not `Clone`, so no second copy of a deleted item stays `Live`.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use webflow_core::error::WebflowError;
use webflow_core::types::HttpMethod;

use crate::WebflowResult;
use super::{decode_value, item_payload, WebflowClient};

/// Lifecycle state of an item handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Live,
    Deleted,
}

#[derive(Deserialize)]
struct ItemEnvelope {
    items: Vec<Value>,
}

/// One item of a CMS collection
#[derive(Debug)]
pub struct Item {
    client: WebflowClient,
    collection_id: String,
    id: String,
    state: Lifecycle,
}

impl Item {
    pub(crate) fn new(client: WebflowClient, collection_id: String, id: String) -> Self {
        Self {
            client,
            collection_id,
            id,
            state: Lifecycle::Live,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    fn url(&self) -> WebflowResult<String> {
        match self.state {
            Lifecycle::Live => Ok(self.client.urls().item(&self.collection_id, &self.id)),
            Lifecycle::Deleted => Err(WebflowError::ItemDeleted { id: self.id.clone() }),
        }
    }

    /// The item's record
    pub async fn get_data(&self) -> WebflowResult<Value> {
        let url = self.url()?;
        let envelope: ItemEnvelope = decode_value(&url, self.client.get(&url).await?)?;
        envelope.items.into_iter().next().ok_or_else(|| {
            WebflowError::invalid_argument("id", format!("item '{}' not found in collection '{}'", self.id, self.collection_id))
        })
    }

    /// Replace the item's fields
    pub async fn update(&self, fields: Map<String, Value>, draft: bool) -> WebflowResult<Value> {
        let url = self.url()?;
        self.client.request(HttpMethod::Put, &url, Some(item_payload(fields, draft))).await
    }

    /// Change only the given fields
    pub async fn patch(&self, fields: Map<String, Value>, draft: bool) -> WebflowResult<Value> {
        let url = self.url()?;
        self.client.request(HttpMethod::Patch, &url, Some(item_payload(fields, draft))).await
    }

    /// Delete the item remotely. The handle is unusable afterwards.
    pub async fn delete(&mut self) -> WebflowResult<Value> {
        let url = self.url()?;
        let response = self.client.request(HttpMethod::Delete, &url, None).await?;
        self.state = Lifecycle::Deleted;
        info!(item = %self.id, collection = %self.collection_id, "Item deleted");
        Ok(response)
    }
}
