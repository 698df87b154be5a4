mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use snaplink::api::handlers::{ACCOUNT_ID_HEADER, shorten_handler};

fn make_server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .with_state(ctx.state.clone());
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/some/page" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(
        body["short_url"],
        format!("{}/{code}", common::BASE_URL)
    );
    assert_eq!(body["original_url"], "https://example.com/some/page");
    assert_eq!(body["click_count"], 0);
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_shorten_with_custom_code() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/", "custom_code": "promo-24" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["code"], "promo-24");
}

#[tokio::test]
async fn test_shorten_rejects_short_custom_code_without_insert() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/", "custom_code": "ab" }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_is_idempotent_per_account() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let first = server
        .post("/api/shorten")
        .add_header(ACCOUNT_ID_HEADER, "42")
        .json(&json!({ "url": "https://example.com/" }))
        .await;
    let second = server
        .post("/api/shorten")
        .add_header(ACCOUNT_ID_HEADER, "42")
        .json(&json!({ "url": "https://example.com/" }))
        .await;

    first.assert_status_ok();
    second.assert_status_ok();
    assert_eq!(
        first.json::<serde_json::Value>()["id"],
        second.json::<serde_json::Value>()["id"]
    );
    assert_eq!(ctx.repository.len(), 1);
}

#[tokio::test]
async fn test_shorten_rejects_malformed_account_header() {
    let ctx = common::create_test_context();
    let server = make_server(&ctx);

    let response = server
        .post("/api/shorten")
        .add_header(ACCOUNT_ID_HEADER, "not-a-number")
        .json(&json!({ "url": "https://example.com/" }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_queues_link_created_event() {
    let mut ctx = common::create_test_context();
    let server = make_server(&ctx);

    server
        .post("/api/shorten")
        .add_header(ACCOUNT_ID_HEADER, "9")
        .json(&json!({ "url": "https://example.com/" }))
        .await
        .assert_status_ok();

    let event = ctx.account_rx.recv().await.unwrap();
    assert!(matches!(
        event,
        snaplink::domain::account_worker::AccountEvent::LinkCreated { owner_id: 9 }
    ));
}
