//! Preview endpoint.
//!
//! Runs the preview engine for one source document and returns its HTML.
//! Status pages are ordinary renderable HTML and are served with 200; the
//! `X-Preview-Status` header tells clients which one they got.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{self, HeaderName};
use axum::response::{Html, IntoResponse, Response};
use rstview_preview::{PreviewRequest, StatusKind};

use crate::error::ServerError;
use crate::handlers::resolve_under_root;
use crate::state::AppState;

/// Header naming the kind of HTML returned.
const PREVIEW_STATUS: &str = "x-preview-status";

/// Handle GET /preview/{path}.
pub(crate) async fn get_preview(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let source = resolve_under_root(&state.root_dir, &path)
        .ok_or_else(|| ServerError::OutsideRoot(path.clone()))?;

    let is_file = match tokio::fs::metadata(&source).await {
        Ok(metadata) => metadata.is_file(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(err) => return Err(err.into()),
    };
    if !is_file {
        return Err(ServerError::FileNotFound(path));
    }

    let mut request = PreviewRequest::new(&source).with_rewrite_links(state.rewrite_links);
    // Documents outside the Sphinx project are rendered on their own
    if let Some(conf_dir) = state.conf_dir.as_ref().filter(|d| source.starts_with(d)) {
        request = request.with_conf_dir(conf_dir);
    }

    let rendered = state.engine.preview(&request, &state.settings).await;
    let status = rendered.status_kind().map_or("content", StatusKind::as_str);

    Ok((
        [
            (HeaderName::from_static(PREVIEW_STATUS), status),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Html(rendered.into_html()),
    )
        .into_response())
}
