//! Tests for the client and resource handles against a mock API

use super::*;
use crate::testing::ScriptedTransport;

use std::time::Duration;

use serde_json::json;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use wiremock::matchers::{body_json, header, method, path, query_param};

fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions {
        base_url: server.uri(),
        retry: RetryPolicy::new(3, Duration::from_millis(1)),
        ..ClientOptions::default()
    }
}

fn client_for(server: &MockServer) -> WebflowClient {
    WebflowClient::new(options_for(server))
        .unwrap()
        .with_credential(Credential::new("test-token").unwrap())
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item-{}", i)).collect()
}

fn requested_ids(request: &Request) -> Vec<String> {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
    serde_json::from_value(body["itemIds"].clone()).unwrap_or_default()
}

/// Reports every requested ID under `key`, except for chunks starting with
/// `fail_on`, which get a 404
struct EchoIds {
    key: &'static str,
    fail_on: Option<&'static str>,
}

impl Respond for EchoIds {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let ids = requested_ids(request);
        if self.fail_on.is_some() && ids.first().map(String::as_str) == self.fail_on {
            return ResponseTemplate::new(404).set_body_string("{\"msg\":\"Item not found\"}");
        }
        ResponseTemplate::new(200).set_body_json(json!({ self.key: ids, "errors": [] }))
    }
}

#[test]
fn test_client_options_default() {
    let options = ClientOptions::default();
    assert_eq!(options.base_url, "https://api.webflow.com");
    assert_eq!(options.pool_size, 50);
    assert_eq!(options.page_size, 100);
    assert_eq!(options.max_items_per_request, 100);
    assert_eq!(options.retry, RetryPolicy::default());
}

#[test]
fn test_invalid_options_rejected() {
    let transport = ScriptedTransport::new(Vec::new());
    let options = ClientOptions {
        pool_size: 0,
        ..ClientOptions::default()
    };
    assert!(matches!(
        WebflowClient::with_transport(transport, options),
        Err(WebflowError::InvalidArgument { .. })
    ));
}

#[test]
fn test_item_payload_flags_and_overrides() {
    let fields = json!({"name": "Hello", "_archived": true});
    let payload = item_payload(fields.as_object().unwrap().clone(), true);

    assert_eq!(payload, json!({"fields": {"_archived": true, "_draft": true, "name": "Hello"}}));
}

#[tokio::test]
async fn test_missing_credential_fails_before_io() {
    let transport = ScriptedTransport::new(vec![crate::client::RawResponse::new(200, "[]")]);
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default()).unwrap();

    let result = client.list_sites().await;

    assert!(matches!(result, Err(WebflowError::AuthNotSet)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unauthenticated_bulk_publish_fails_once() {
    let transport = ScriptedTransport::new(Vec::new());
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default()).unwrap();

    let result = client.collection("c1").publish_items(ids(250)).await;

    assert!(matches!(result, Err(WebflowError::AuthNotSet)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unauthenticated_bulk_delete_fails_once() {
    let transport = ScriptedTransport::new(Vec::new());
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default()).unwrap();

    let result = client.collection("c1").delete_items(ids(250)).await;

    assert!(matches!(result, Err(WebflowError::AuthNotSet)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unauthenticated_post_items_fails_once() {
    let transport = ScriptedTransport::new(Vec::new());
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default()).unwrap();
    let fields: Vec<Map<String, Value>> = (0..3)
        .map(|i| json!({"name": format!("n{}", i)}).as_object().unwrap().clone())
        .collect();

    let result = client.collection("c1").post_items(fields, false).await;

    assert!(matches!(result, Err(WebflowError::AuthNotSet)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unauthenticated_empty_bulk_publish_still_fails() {
    let transport = ScriptedTransport::new(Vec::new());
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default()).unwrap();

    let result = client.collection("c1").publish_items(Vec::new()).await;

    assert!(matches!(result, Err(WebflowError::AuthNotSet)));
}

#[tokio::test]
async fn test_authenticate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WebflowClient::new(options_for(&mock_server)).unwrap();
    assert!(client.credential().is_none());

    let client = client.authenticate("good-token").await.unwrap();
    assert_eq!(client.credential().unwrap().token(), "good-token");
}

#[tokio::test]
async fn test_authenticate_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"err\":\"Unauthorized\"}"))
        .mount(&mock_server)
        .await;

    let client = WebflowClient::new(options_for(&mock_server)).unwrap();
    let result = client.authenticate("bad-token").await;

    assert!(matches!(result, Err(WebflowError::Http { status: 401, .. })));
}

#[tokio::test]
async fn test_list_sites() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "s1", "name": "One"},
            {"_id": "s2", "name": "Two"}
        ])))
        .mount(&mock_server)
        .await;

    let sites = client_for(&mock_server).list_sites().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[1]["_id"], "s2");
}

#[tokio::test]
async fn test_site_publish_defaults_to_all_domains() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites/s1/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "d1", "name": "example.com"},
            {"_id": "d2", "name": "www.example.com"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sites/s1/publish"))
        .and(body_json(json!({"domains": ["example.com", "www.example.com"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"queued": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server).site("s1").publish(None).await.unwrap();
    assert_eq!(response, json!({"queued": true}));
}

#[tokio::test]
async fn test_get_items_malformed_page_is_decode_error() {
    let transport = ScriptedTransport::new(vec![crate::client::RawResponse::new(200, r#"{"items": "none", "total": 1}"#)]);
    let client = WebflowClient::with_transport(transport.clone(), ClientOptions::default())
        .unwrap()
        .with_credential(Credential::new("test-token").unwrap());

    match client.collection("c1").get_items(0, 10).await {
        Err(WebflowError::Decode { url, .. }) => assert!(url.contains("/collections/c1/items")),
        other => panic!("Expected Decode error, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_get_all_items_reads_every_page_in_order() {
    let mock_server = MockServer::start().await;

    for offset in [0u64, 100, 200] {
        let end = (offset + 100).min(250);
        let items: Vec<Value> = (offset..end).map(|n| json!({"_id": format!("item-{}", n)})).collect();
        Mock::given(method("GET"))
            .and(path("/collections/c1/items"))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "count": end - offset,
                "limit": 100,
                "offset": offset,
                "total": 250
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let items = client_for(&mock_server).collection("c1").get_all_items().await.unwrap();

    assert_eq!(items.len(), 250);
    assert_eq!(items[0]["_id"], "item-0");
    assert_eq!(items[100]["_id"], "item-100");
    assert_eq!(items[249]["_id"], "item-249");
}

#[tokio::test]
async fn test_get_items_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/c1/items"))
        .and(query_param("offset", "10"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"_id": "a"}],
            "count": 1,
            "limit": 5,
            "offset": 10,
            "total": 11
        })))
        .mount(&mock_server)
        .await;

    let page = client_for(&mock_server).collection("c1").get_items(10, 5).await.unwrap();
    assert_eq!(page.total, 11);
    assert_eq!(page.items, vec![json!({"_id": "a"})]);
}

#[tokio::test]
async fn test_post_item_sends_fields_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections/c1/items"))
        .and(body_json(json!({"fields": {"_archived": false, "_draft": true, "name": "Hello", "slug": "hello"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "new", "slug": "hello"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fields = json!({"name": "Hello", "slug": "hello"}).as_object().unwrap().clone();
    let created = client_for(&mock_server).collection("c1").post_item(fields, true).await.unwrap();
    assert_eq!(created["_id"], "new");
}

#[tokio::test]
async fn test_post_items_keeps_input_order() {
    let mock_server = MockServer::start().await;

    struct EchoName;
    impl Respond for EchoName {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            ResponseTemplate::new(200).set_body_json(json!({"name": body["fields"]["name"]}))
        }
    }

    Mock::given(method("POST"))
        .and(path("/collections/c1/items"))
        .respond_with(EchoName)
        .expect(5)
        .mount(&mock_server)
        .await;

    let fields_list: Vec<Map<String, Value>> = (0..5)
        .map(|n| json!({"name": format!("n{}", n)}).as_object().unwrap().clone())
        .collect();
    let created = client_for(&mock_server).collection("c1").post_items(fields_list, false).await.unwrap();

    let names: Vec<&str> = created.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["n0", "n1", "n2", "n3", "n4"]);
}

#[tokio::test]
async fn test_publish_items_in_chunks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/collections/c1/items/publish"))
        .respond_with(EchoIds { key: "publishedItemIds", fail_on: None })
        .expect(3)
        .mount(&mock_server)
        .await;

    let merged = client_for(&mock_server).collection("c1").publish_items(ids(250)).await.unwrap();

    let published = merged["publishedItemIds"].as_array().unwrap();
    assert_eq!(published.len(), 250);
    assert_eq!(published[0], "item-0");
    assert_eq!(published[249], "item-249");
    assert_eq!(merged["errors"], json!([]));
}

#[tokio::test]
async fn test_delete_items_empty_list_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let merged = client_for(&mock_server).collection("c1").delete_items(Vec::new()).await.unwrap();
    assert_eq!(Value::Object(merged), json!({"deletedItemIds": [], "errors": []}));
}

#[tokio::test]
async fn test_delete_items_failed_chunk_fails_whole_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/c1/items"))
        .respond_with(EchoIds { key: "deletedItemIds", fail_on: Some("item-100") })
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).collection("c1").delete_items(ids(250)).await;

    match result {
        Err(WebflowError::Http { status, chunk, .. }) => {
            assert_eq!(status, 404);
            assert_eq!(chunk, Some(1));
        }
        other => panic!("Expected Http error for chunk 1, got {:?}", other),
    }
}

#[tokio::test]
async fn test_item_get_data_returns_first_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/c1/items/i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"_id": "i1", "name": "Hello"}],
            "count": 1,
            "limit": 1,
            "offset": 0,
            "total": 1
        })))
        .mount(&mock_server)
        .await;

    let data = client_for(&mock_server).item("c1", "i1").get_data().await.unwrap();
    assert_eq!(data, json!({"_id": "i1", "name": "Hello"}));
}

#[tokio::test]
async fn test_item_patch_uses_patch_method() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/collections/c1/items/i1"))
        .and(body_json(json!({"fields": {"_archived": false, "_draft": false, "name": "Renamed"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "i1", "name": "Renamed"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fields = json!({"name": "Renamed"}).as_object().unwrap().clone();
    let updated = client_for(&mock_server).item("c1", "i1").patch(fields, false).await.unwrap();
    assert_eq!(updated["name"], "Renamed");
}

#[tokio::test]
async fn test_deleted_item_refuses_further_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/c1/items/i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut item = client_for(&mock_server).item("c1", "i1");
    assert_eq!(item.state(), Lifecycle::Live);

    let response = item.delete().await.unwrap();
    assert_eq!(response, json!({"deleted": 1}));
    assert_eq!(item.state(), Lifecycle::Deleted);

    assert!(matches!(item.get_data().await, Err(WebflowError::ItemDeleted { ref id }) if id == "i1"));
    assert!(matches!(item.delete().await, Err(WebflowError::ItemDeleted { .. })));
}

#[tokio::test]
async fn test_failed_delete_keeps_item_live() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/c1/items/i1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut item = client_for(&mock_server).item("c1", "i1");
    assert!(item.delete().await.is_err());
    assert_eq!(item.state(), Lifecycle::Live);
}

/// `CloneCheck::<T>::IS_CLONE` is true only when `T: Clone`; otherwise the
/// trait's default constant is picked
struct CloneCheck<T>(std::marker::PhantomData<T>);

trait NotClone {
    const IS_CLONE: bool = false;
}

impl<T> NotClone for CloneCheck<T> {}

impl<T: Clone> CloneCheck<T> {
    const IS_CLONE: bool = true;
}

#[test]
fn test_item_handle_cannot_be_duplicated() {
    assert!(!CloneCheck::<Item>::IS_CLONE);
    assert!(CloneCheck::<Collection>::IS_CLONE);
}
