pub mod handlers;
pub mod middleware;
pub mod state;
pub mod upstream;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use state::{AppState, ProxySettings};
pub use upstream::{Upstream, UpstreamResponse};

/// The proxy's routes. Every request, routed or passed through, is classified
/// by the path filter first.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_request_size_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        // Session lifecycle
        .route("/session", post(handlers::session_create))
        .route("/account", get(handlers::account))
        .route("/logout", get(handlers::logout))
        // Tenant-scoped search endpoints
        .route("/_filtered_msearch", post(handlers::filtered_msearch))
        .route("/:index/_filtered_search", post(handlers::filtered_search))
        .route("/_filtered_internal_search", post(handlers::filtered_internal_search))
        .route("/:index/_filtered_suggestions", post(handlers::filtered_suggestions))
        // Everything else goes to the dashboard as-is
        .fallback(handlers::passthrough)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::path_filter_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// [`router`] with HTTP request tracing
pub fn traced_router(state: AppState) -> Router {
    router(state).layer(TraceLayer::new_for_http())
}
