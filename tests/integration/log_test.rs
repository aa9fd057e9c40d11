//! Integration tests for what request handling writes to the log.

use std::fmt;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::helpers::TestApp;

/// Records the fields of every span and event, at every level.
#[derive(Clone, Default)]
struct CapturedFields(Arc<Mutex<Vec<String>>>);

impl CapturedFields {
    fn lines(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }

    fn push(&self, line: String) {
        self.0.lock().expect("lock").push(line);
    }
}

struct FieldText(String);

impl Visit for FieldText {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push_str(&format!("{}={:?} ", field.name(), value));
    }
}

impl<S: Subscriber> Layer<S> for CapturedFields {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut text = FieldText(format!("span {} ", attrs.metadata().name()));
        attrs.record(&mut text);
        self.push(text.0);
    }

    fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut text = FieldText("record ".to_string());
        values.record(&mut text);
        self.push(text.0);
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut text = FieldText("event ".to_string());
        event.record(&mut text);
        self.push(text.0);
    }
}

#[tokio::test]
async fn test_redeem_never_logs_the_token() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let (_, files) = app.upload(&user, &[("secret.txt", "payload")]).await;
    let path = app
        .issue_link(&format!("/temp/create/file/{}?user_id={user}", files[0]))
        .await;
    let token = path.rsplit('/').next().expect("token").to_string();

    let captured = CapturedFields::default();
    let subscriber = Registry::default().with(captured.clone());
    let response = {
        let _guard = tracing::subscriber::set_default(subscriber);
        app.request("GET", &path, None).await
    };
    assert_eq!(response.status, StatusCode::OK);

    let lines = captured.lines();
    assert!(
        lines
            .iter()
            .any(|line| line.starts_with("span request ") && line.contains("path=/temp/download/file/…")),
        "request span missing: {lines:?}"
    );
    for line in &lines {
        assert!(!line.contains(&token), "token logged in {line}");
    }
}
