//! Site handle

use serde_json::{json, Value};

use webflow_core::types::HttpMethod;

use crate::api::Domain;
use crate::WebflowResult;
use super::WebflowClient;

/// A site in the Webflow account
#[derive(Debug, Clone)]
pub struct Site {
    client: WebflowClient,
    id: String,
}

impl Site {
    pub(crate) fn new(client: WebflowClient, id: String) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Site information (name, short name, last published, ...)
    pub async fn get_data(&self) -> WebflowResult<Value> {
        self.client.get(&self.client.urls().site(&self.id)).await
    }

    /// Domains the site can be published to
    pub async fn get_domains(&self) -> WebflowResult<Vec<Domain>> {
        self.client.get_as(&self.client.urls().site_domains(&self.id)).await
    }

    /// Collections of the site's CMS
    pub async fn get_collections(&self) -> WebflowResult<Vec<Value>> {
        self.client.get_as(&self.client.urls().site_collections(&self.id)).await
    }

    /// Publish the site. Without explicit domains it goes to every domain
    /// of the site.
    pub async fn publish(&self, domains: Option<Vec<String>>) -> WebflowResult<Value> {
        let domains = match domains {
            Some(domains) => domains,
            None => self.get_domains().await?.into_iter().map(|domain| domain.name).collect(),
        };

        self.client
            .request(
                HttpMethod::Post,
                &self.client.urls().site_publish(&self.id),
                Some(json!({ "domains": domains })),
            )
            .await
    }
}
