//! Webflow API endpoints and response types

use serde::{Deserialize, Serialize};
use url::Url;

use webflow_core::error::WebflowError;
use webflow_core::types::PageDescriptor;
use crate::WebflowResult;

/// Public Webflow API root
pub const DEFAULT_BASE_URL: &str = "https://api.webflow.com";

/// Builds the fully-qualified URL of every endpoint the client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrls {
    base: Url,
}

impl ApiUrls {
    /// Parse the API root. Any trailing slash is ignored.
    pub fn new(base_url: &str) -> WebflowResult<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| WebflowError::invalid_argument("base_url", format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(WebflowError::invalid_argument("base_url", format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn user(&self) -> String {
        self.endpoint(&["user"]).into()
    }

    pub fn sites(&self) -> String {
        self.endpoint(&["sites"]).into()
    }

    pub fn site(&self, site_id: &str) -> String {
        self.endpoint(&["sites", site_id]).into()
    }

    pub fn site_domains(&self, site_id: &str) -> String {
        self.endpoint(&["sites", site_id, "domains"]).into()
    }

    pub fn site_collections(&self, site_id: &str) -> String {
        self.endpoint(&["sites", site_id, "collections"]).into()
    }

    pub fn site_publish(&self, site_id: &str) -> String {
        self.endpoint(&["sites", site_id, "publish"]).into()
    }

    pub fn collection(&self, collection_id: &str) -> String {
        self.endpoint(&["collections", collection_id]).into()
    }

    pub fn collection_items(&self, collection_id: &str) -> String {
        self.endpoint(&["collections", collection_id, "items"]).into()
    }

    /// One page of a collection's items
    pub fn collection_items_page(&self, collection_id: &str, page: PageDescriptor) -> String {
        let mut url = self.endpoint(&["collections", collection_id, "items"]);
        url.query_pairs_mut()
            .append_pair("offset", &page.offset.to_string())
            .append_pair("limit", &page.limit.to_string());
        url.into()
    }

    pub fn collection_publish(&self, collection_id: &str) -> String {
        self.endpoint(&["collections", collection_id, "items", "publish"]).into()
    }

    pub fn item(&self, collection_id: &str, item_id: &str) -> String {
        self.endpoint(&["collections", collection_id, "items", item_id]).into()
    }
}

/// Response of the `/user` endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Account owning the API token
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

impl User {
    /// "First Last", skipping whichever part is missing
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Domain a site can be published to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Domain {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: String,
}

/// Response keys of the bulk item publish endpoint
pub const PUBLISH_ITEMS_KEYS: [&str; 2] = ["publishedItemIds", "errors"];

/// Response keys of the bulk item delete endpoint
pub const DELETE_ITEMS_KEYS: [&str; 2] = ["deletedItemIds", "errors"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let urls = ApiUrls::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(urls.base(), "https://api.webflow.com");
        assert_eq!(urls.sites(), "https://api.webflow.com/sites");
        assert_eq!(urls.site_domains("s1"), "https://api.webflow.com/sites/s1/domains");
        assert_eq!(urls.collection_publish("c1"), "https://api.webflow.com/collections/c1/items/publish");
        assert_eq!(urls.item("c1", "i1"), "https://api.webflow.com/collections/c1/items/i1");
    }

    #[test]
    fn test_items_page_query() {
        let urls = ApiUrls::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(
            urls.collection_items_page("c1", PageDescriptor::new(200, 100)),
            "http://127.0.0.1:8080/collections/c1/items?offset=200&limit=100"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let urls = ApiUrls::new("https://proxy.example.com/webflow").unwrap();
        assert_eq!(urls.user(), "https://proxy.example.com/webflow/user");
    }

    #[test]
    fn test_ids_are_path_encoded() {
        let urls = ApiUrls::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(urls.collection("a/b"), "https://api.webflow.com/collections/a%2Fb");
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(ApiUrls::new("not a url").is_err());
        assert!(ApiUrls::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_user_display_name() {
        let response: UserResponse = serde_json::from_value(serde_json::json!({
            "user": {"_id": "u1", "email": "a@b.c", "firstName": "Ada", "lastName": "Lovelace"}
        }))
        .unwrap();
        assert_eq!(response.user.display_name(), "Ada Lovelace");
    }
}
