//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use filestash_api::{Backends, build_app, build_state};
use filestash_core::config::AppConfig;
use filestash_storage::LocalStorageProvider;

const BOUNDARY: &str = "filestash-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    _data_dir: TempDir,
}

impl TestApp {
    /// Create a new test application over in-memory backends and a temp
    /// upload directory.
    pub async fn new() -> Self {
        Self::with_config(Self::default_config()).await
    }

    /// Config used by [`TestApp::new`].
    pub fn default_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.public_base_url = Some("https://files.test".to_string());
        config.server.max_upload_size_bytes = 64 * 1024;
        config
    }

    /// Create a test application with `config`.
    pub async fn with_config(config: AppConfig) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = LocalStorageProvider::new(data_dir.path())
            .await
            .expect("Failed to init storage");

        let state = build_state(config.clone(), Backends::in_memory(), Arc::new(storage));
        Self {
            router: build_app(state),
            config,
            _data_dir: data_dir,
        }
    }

    /// Create a user and return their ID
    pub async fn create_user(&self) -> String {
        let response = self.request("POST", "/users/create", None).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("No id in create response")
            .to_string()
    }

    /// Upload `files` as `(name, content)` pairs and return the group ID and
    /// file IDs in upload order.
    pub async fn upload(&self, user_id: &str, files: &[(&str, &str)]) -> (String, Vec<String>) {
        let response = self.upload_raw(user_id, files).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let data = &response.body["data"];
        let group = data["group_id"].as_str().expect("group_id").to_string();
        let ids = data["files"]
            .as_array()
            .expect("files")
            .iter()
            .map(|f| f["id"].as_str().expect("file id").to_string())
            .collect();
        (group, ids)
    }

    /// Send a multipart upload without asserting on the outcome.
    pub async fn upload_raw(&self, user_id: &str, files: &[(&str, &str)]) -> TestResponse {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        let req = Request::builder()
            .method("POST")
            .uri(format!("/files/upload?user_id={user_id}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Issue a link and return its URL path (scheme and host stripped).
    pub async fn issue_link(&self, path: &str) -> String {
        let response = self.request("POST", path, None).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let url = response.body["data"]["url"].as_str().expect("url");
        url.strip_prefix("https://files.test")
            .expect("url uses public_base_url")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` for binary responses)
    pub body: Value,
    /// Raw body
    pub bytes: Bytes,
}

impl TestResponse {
    /// Header value as a string.
    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// Machine-readable error code of an error response.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Entries of a zip body as `(name, content)`, sorted by name.
    pub fn zip_entries(&self) -> Vec<(String, String)> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(self.bytes.to_vec())).expect("valid zip");
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).expect("entry");
            let mut content = String::new();
            entry.read_to_string(&mut content).expect("utf-8 entry");
            entries.push((entry.name().to_string(), content));
        }
        entries.sort();
        entries
    }
}
