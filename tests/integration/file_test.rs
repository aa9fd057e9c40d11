//! Integration tests for uploads, listings, and owner downloads.

use axum::http::{StatusCode, header};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_upload_then_list() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (group, files) = app.upload(&user, &[("a.txt", "alpha"), ("b.txt", "beta")]).await;
    assert_eq!(files.len(), 2);

    let response = app.request("GET", &format!("/files/list/{user}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));

    let response = app.request("GET", &format!("/groups/list/{user}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["id"], group.as_str());

    let response = app
        .request("GET", &format!("/groups/{group}/files?user_id={user}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<_> = response.body["data"]
        .as_array()
        .expect("files")
        .iter()
        .map(|f| f["filename"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(names.contains(&"a.txt".to_string()));
    assert!(names.contains(&"b.txt".to_string()));
}

#[tokio::test]
async fn test_upload_requires_user_id() {
    let app = TestApp::new().await;

    let response = app.upload_raw("", &[("a.txt", "alpha")]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let response = app.upload_raw(&user, &[]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let big = "x".repeat(64 * 1024 + 1);

    let response = app.upload_raw(&user, &[("big.bin", &big)]).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_owner_downloads_file() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (_, files) = app.upload(&user, &[("notes.txt", "hello")]).await;

    let response = app
        .request("GET", &format!("/files/{}/download?user_id={user}", files[0]), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.bytes[..], b"hello");
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
    assert_eq!(response.header(header::CONTENT_LENGTH), "5");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"notes.txt\""
    );
}

#[tokio::test]
async fn test_owner_downloads_group_zip() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (group, _) = app.upload(&user, &[("a.txt", "1"), ("a.txt", "2")]).await;

    let response = app
        .request("GET", &format!("/groups/{group}/download?user_id={user}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "application/zip");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        format!("attachment; filename=\"{group}.zip\"")
    );
    let names: Vec<_> = response.zip_entries().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a (1).txt".to_string(), "a.txt".to_string()]);
}

#[tokio::test]
async fn test_non_owner_cannot_download() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let stranger = app.create_user().await;
    let (group, files) = app.upload(&owner, &[("a.txt", "alpha")]).await;

    let response = app
        .request("GET", &format!("/files/{}/download?user_id={stranger}", files[0]), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", &format!("/groups/{group}/download?user_id={stranger}"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}
