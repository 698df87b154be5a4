mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use snaplink::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = common::create_test_context();
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["click_queue_capacity"], 2048);
    assert_eq!(body["click_queue_free"], 2048);
}

#[tokio::test]
async fn test_health_reports_queue_backlog() {
    let ctx = common::create_test_context();
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());
    let server = TestServer::new(app).unwrap();

    for i in 0..3 {
        ctx.state
            .click_tx
            .try_send(snaplink::domain::click_event::ClickEvent::new(
                i, None, None, None,
            ))
            .unwrap();
    }

    let response = server.get("/health").await;
    let body = response.json::<serde_json::Value>();

    assert_eq!(body["click_queue_free"], 2048 - 3);
}
