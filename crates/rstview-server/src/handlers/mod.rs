//! HTTP request handlers.

pub(crate) mod preview;
pub(crate) mod resources;

use std::path::{Path, PathBuf};

use rstview_preview::normalize_path;

/// Resolve `path` against `root`, rejecting results outside `root`.
///
/// `root` must be absolute and normalized.
pub(crate) fn resolve_under_root(root: &Path, path: &str) -> Option<PathBuf> {
    let resolved = normalize_path(&root.join(path));
    resolved.starts_with(root).then_some(resolved)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use tower::ServiceExt;

    use crate::ServerConfig;
    use crate::app::create_router;

    /// Send a GET request through a fresh router.
    pub(crate) async fn get(config: ServerConfig, uri: &str) -> (StatusCode, HeaderMap, String) {
        let app = create_router(Arc::new(config.into_state()));
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, headers, String::from_utf8_lossy(&body).into_owned())
    }
}
