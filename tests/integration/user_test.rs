//! Integration tests for users and health.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["backend"], "memory");
}

#[tokio::test]
async fn test_create_user_returns_distinct_ids() {
    let app = TestApp::new().await;

    let first = app.create_user().await;
    let second = app.create_user().await;

    assert_ne!(first, second);
    assert!(uuid::Uuid::parse_str(&first).is_ok());
}

#[tokio::test]
async fn test_unknown_user_has_no_files() {
    let app = TestApp::new().await;
    let ghost = uuid::Uuid::new_v4();

    let response = app
        .request("GET", &format!("/files/list/{ghost}"), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}
