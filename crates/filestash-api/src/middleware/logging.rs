//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, info};

/// Logs request method, path, status, and duration.
///
/// Only the route prefix is logged for `/temp/download/*` so bearer tokens
/// never reach the log.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = loggable_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request"
    );

    response
}

/// Span for `TraceLayer`, carrying the redacted path instead of the URI.
pub fn make_request_span(request: &Request) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %loggable_path(request.uri().path()),
        version = ?request.version(),
    )
}

pub(crate) fn loggable_path(path: &str) -> String {
    match path.strip_prefix("/temp/download/") {
        Some(rest) => {
            let route = rest.split('/').next().unwrap_or_default();
            format!("/temp/download/{route}/…")
        }
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_not_logged() {
        assert_eq!(
            loggable_path("/temp/download/file/abcdef0123456789"),
            "/temp/download/file/…"
        );
        assert_eq!(loggable_path("/files/list/42"), "/files/list/42");
    }

    #[test]
    fn test_group_tokens_are_not_logged() {
        assert_eq!(
            loggable_path("/temp/download/files/abcdef0123456789"),
            "/temp/download/files/…"
        );
    }
}
