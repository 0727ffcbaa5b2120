use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::state::AppState;
use crate::error::ApiError;

/// Rejects denied paths before routing; unknown paths continue after the
/// classifier has emitted its audit event.
pub async fn path_filter_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = state
        .classifier
        .classify(request.uri().path(), state.sink.as_ref());

    if decision.is_denied() {
        tracing::info!(
            path = %decision.original,
            normalized = %decision.normalized,
            rule = decision.rule.as_deref().unwrap_or_default(),
            "path denied"
        );
        return ApiError::forbidden("forbidden").into_response();
    }

    next.run(request).await
}
