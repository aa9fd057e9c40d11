//! Integration tests for single-use temporary links.

use axum::http::{StatusCode, header};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_file_link_redeems_once() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (_, files) = app.upload(&user, &[("hello.txt", "hello world")]).await;

    let path = app
        .issue_link(&format!("/temp/create/file/{}?user_id={user}", files[0]))
        .await;
    assert!(path.starts_with("/temp/download/file/"));

    let first = app.request("GET", &path, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(&first.bytes[..], b"hello world");
    assert_eq!(
        first.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"hello.txt\""
    );

    let second = app.request("GET", &path, None).await;
    assert_eq!(second.status, StatusCode::GONE);
    assert_eq!(second.error_code(), "LINK_CONSUMED");
}

#[tokio::test]
async fn test_group_link_returns_every_file() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (group, _) = app
        .upload(&user, &[("a.txt", "one"), ("b.txt", "two"), ("c.txt", "three")])
        .await;

    let path = app
        .issue_link(&format!("/temp/create/files/{group}?user_id={user}"))
        .await;
    assert!(path.starts_with("/temp/download/files/"));

    let response = app.request("GET", &path, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "application/zip");
    assert_eq!(
        response.zip_entries(),
        vec![
            ("a.txt".to_string(), "one".to_string()),
            ("b.txt".to_string(), "two".to_string()),
            ("c.txt".to_string(), "three".to_string()),
        ]
    );

    let again = app.request("GET", &path, None).await;
    assert_eq!(again.status, StatusCode::GONE);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new().await;

    for path in [
        "/temp/download/file/nonexistent-token",
        "/temp/download/files/nonexistent-token",
    ] {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code(), "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_non_owner_cannot_issue() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let stranger = app.create_user().await;
    let (group, files) = app.upload(&owner, &[("a.txt", "alpha")]).await;

    let response = app
        .request(
            "POST",
            &format!("/temp/create/file/{}?user_id={stranger}", files[0]),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("POST", &format!("/temp/create/files/{group}?user_id={stranger}"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_group_token_on_file_route_is_not_consumed() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (group, _) = app.upload(&user, &[("a.txt", "alpha")]).await;

    let path = app
        .issue_link(&format!("/temp/create/files/{group}?user_id={user}"))
        .await;
    let token = path.rsplit('/').next().expect("token");

    let wrong = app
        .request("GET", &format!("/temp/download/file/{token}"), None)
        .await;
    assert_eq!(wrong.status, StatusCode::NOT_FOUND);

    let right = app.request("GET", &path, None).await;
    assert_eq!(right.status, StatusCode::OK);
}

#[tokio::test]
async fn test_link_url_follows_forwarded_headers() {
    let mut config = TestApp::default_config();
    config.server.public_base_url = None;
    let app = TestApp::with_config(config).await;
    let user = app.create_user().await;
    let (_, files) = app.upload(&user, &[("a.txt", "alpha")]).await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri(format!("/temp/create/file/{}?user_id={user}", files[0]))
        .header(header::HOST, "downloads.example.com")
        .header("x-forwarded-proto", "https")
        .body(axum::body::Body::empty())
        .expect("request");
    let response = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    let url = body["data"]["url"].as_str().expect("url");
    assert!(url.starts_with("https://downloads.example.com/temp/download/file/"));
}

#[tokio::test]
async fn test_expired_link_is_gone() {
    let mut config = TestApp::default_config();
    config.links.ttl_seconds = Some(1);
    let app = TestApp::with_config(config).await;
    let user = app.create_user().await;
    let (_, files) = app.upload(&user, &[("a.txt", "alpha")]).await;

    let path = app
        .issue_link(&format!("/temp/create/file/{}?user_id={user}", files[0]))
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = app.request("GET", &path, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "LINK_EXPIRED");
}
