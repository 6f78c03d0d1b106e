//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
///
/// Preview failures never show up here; they are rendered as status pages.
/// These errors cover requests that do not name a servable file.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Requested path resolves outside the served root.
    #[error("Path outside served root: {0}")]
    OutsideRoot(String),

    /// No file at the requested path.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::OutsideRoot(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Path outside served root", "path": path}),
            ),
            Self::FileNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "File not found", "path": path}),
            ),
            Self::Io(e) => {
                tracing::warn!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
