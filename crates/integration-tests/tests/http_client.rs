//! Header handling and error mapping of the shared HTTP client.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use jaangkhon_core::ProductId;
use jaangkhon_integration_tests::{TestContext, api_path, envelope, product_json};
use jaangkhon_storefront::api::{ApiClient, ApiResponse};
use jaangkhon_storefront::config::StorefrontConfig;
use jaangkhon_storefront::error::ClientError;
use jaangkhon_storefront::session::{MemoryStore, SessionStore, keys};

#[tokio::test]
async fn test_bearer_header_only_with_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&ctx.server)
        .await;

    ctx.state.catalog().list_products(None).await.unwrap();
    ctx.store.set(keys::TOKEN, "T1").unwrap();
    ctx.state.catalog().list_products(None).await.unwrap();

    let requests = ctx.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer T1"
    );
    for request in &requests {
        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "application/json"
        );
    }
}

#[tokio::test]
async fn test_empty_token_is_not_sent() {
    let ctx = TestContext::new().await;
    ctx.store.set(keys::TOKEN, "").unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&ctx.server)
        .await;

    ctx.state.catalog().list_products(None).await.unwrap();

    let requests = ctx.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_token_is_read_per_request() {
    let ctx = TestContext::new().await;
    ctx.store.set(keys::TOKEN, "T1").unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("/products/1")))
        .and(header("authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(product_json(1, "Mango", "Fruit"))),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.store.set(keys::TOKEN, "T2").unwrap();
    let product = ctx.state.catalog().get_product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.name, "Mango");
}

#[tokio::test]
async fn test_non_json_error_body_gets_generic_message() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&ctx.server)
        .await;

    let err = ctx.state.catalog().list_products(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 502, .. }));
    assert_eq!(err.to_string(), "Something went wrong");
}

#[tokio::test]
async fn test_error_body_without_message_gets_generic_message() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(api_path("/products/9")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"success": false})))
        .mount(&ctx.server)
        .await;

    let err = ctx.state.catalog().get_product(ProductId::new(9)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Something went wrong");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&ctx.server)
        .await;

    let err = ctx.state.catalog().list_products(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let config = StorefrontConfig::with_api_url("http://127.0.0.1:9/api").unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let api = ApiClient::new(&config, store).unwrap();

    let err = api
        .get::<ApiResponse<serde_json::Value>>("/products")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.status().is_none());
    assert!(err.to_string().starts_with("Network error"));
}
