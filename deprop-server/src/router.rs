//! Router assembly for the deprop HTTP API.
//!
//! [`build_router`] wires the handlers to their routes with a tracing
//! middleware layer.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router.
///
/// Non-POST requests to `/api/deprecate` get a JSON 405 instead of axum's
/// empty default.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/deprecate",
            post(handlers::deprecate::deprecate)
                .fallback(handlers::deprecate::method_not_allowed),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
