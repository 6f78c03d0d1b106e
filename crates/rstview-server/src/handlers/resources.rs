//! Resource endpoint.
//!
//! Serves files referenced by rewritten preview links. Link targets are
//! absolute paths, so `/_resource/{path}` maps to `/{path}` on disk, and only
//! files under the served root or the build output directory are returned.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use rstview_preview::normalize_path;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /_resource/{path}.
pub(crate) async fn get_resource(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let file = normalize_path(&PathBuf::from("/").join(&path));
    if !state.resource_roots.iter().any(|root| file.starts_with(root)) {
        tracing::debug!(path = %file.display(), "Refusing resource outside root");
        return Err(ServerError::OutsideRoot(path));
    }

    let content = match tokio::fs::read(&file).await {
        Ok(content) => content,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            return Err(ServerError::FileNotFound(path));
        }
        Err(err) => return Err(err.into()),
    };

    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.essence_str().to_owned())], content).into_response())
}
