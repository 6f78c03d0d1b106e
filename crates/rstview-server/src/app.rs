//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/preview/{*path}", get(handlers::preview::get_preview))
        .route(
            "/_resource/{*path}",
            get(handlers::resources::get_resource),
        )
        .layer(
            ServiceBuilder::new()
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
