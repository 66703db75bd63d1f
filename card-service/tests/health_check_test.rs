//! Operational endpoints.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_returns_200() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "card-service-test");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_reports_store_up() {
    let app = TestApp::spawn().await;

    let response = app.client().get(app.url("/ready")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn metrics_endpoint_is_public() {
    let app = TestApp::spawn().await;

    let response = app.client().get(app.url("/metrics")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn responses_carry_security_headers_and_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(app.url("/health"))
        .header("x-request-id", "test-request-1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "test-request-1");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
