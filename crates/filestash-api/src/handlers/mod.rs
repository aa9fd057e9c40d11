//! Route handlers organized by domain.

pub mod file;
pub mod health;
pub mod link;
pub mod user;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use filestash_core::error::AppError;
use filestash_service::DownloadResult;

/// Turns downloaded bytes into an attachment response.
pub(crate) fn attachment(result: DownloadResult) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&result.filename),
        )
        .header(header::CONTENT_LENGTH, result.data.len())
        .body(Body::from(result.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// `attachment; filename="..."` with quotes, backslashes, and control
/// characters replaced so the header stays valid.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_escapes_quotes() {
        assert_eq!(
            content_disposition("report \"final\".pdf"),
            "attachment; filename=\"report _final_.pdf\""
        );
        assert_eq!(content_disposition("a\r\nb.txt"), "attachment; filename=\"a__b.txt\"");
    }
}
