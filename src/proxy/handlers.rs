use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::{json, Value};

use super::state::AppState;
use crate::audit::EventLevel;
use crate::error::ApiError;
use crate::platform::PlatformClient;
use crate::scope::QueryShape;
use crate::session::{lookup_session, Credentials};
use crate::types::AuthorizationContext;

/// Session id from the request's cookie header
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn session_cookie(cookie_name: &str, session_id: &str) -> String {
    format!("{cookie_name}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

fn cleared_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}

/// Starts a session from tokens obtained by the identity layer
pub async fn session_create(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    if credentials.access_token.trim().is_empty() {
        return Err(ApiError::bad_request("access_token is required"));
    }

    let client = PlatformClient::new(
        credentials.access_token.clone(),
        state.settings.account_info_uri.clone(),
        state.settings.platform_timeout,
    )?;
    let outcome = state.contexts.build(credentials, &client, &client).await;

    let cookie = session_cookie(&state.settings.cookie_name, &outcome.session_id);
    let body = json!({
        "session_id": outcome.session_id,
        "authorized": outcome.context.is_some(),
    });
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// The cached profile of the signed-in user, or `{}`
pub async fn account(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let Some(id) = session_id(&headers, &state.settings.cookie_name) else {
        return Json(json!({}));
    };
    match lookup_session(state.sessions.as_ref(), &id, state.sink.as_ref()).await {
        Some(entry) => Json(serde_json::to_value(&entry.account.profile).unwrap_or_else(|_| json!({}))),
        None => Json(json!({})),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers, &state.settings.cookie_name) {
        if let Err(e) = state.sessions.drop_session(&id).await {
            state.sink.log(
                EventLevel::Error,
                &["error", "authentication", "session:logout"],
                &e.to_string(),
            );
        }
    }
    (
        [(header::SET_COOKIE, cleared_cookie(&state.settings.cookie_name))],
        Redirect::to(&state.settings.logout_uri),
    )
        .into_response()
}

/// Index names are spliced into upstream paths, so anything that could leave
/// the path segment is rejected.
pub fn checked_index(index: &str) -> Result<&str, ApiError> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control();
    if index.is_empty() || index.contains("..") || index.chars().any(unsafe_char) {
        return Err(ApiError::bad_request(format!("Invalid index name: {index:?}")));
    }
    Ok(index)
}

/// The context to scope with, `None` when the session bypasses scoping.
/// A missing session or context is rejected, never forwarded unscoped.
async fn scoping_context(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<AuthorizationContext>, ApiError> {
    let id = session_id(headers, &state.settings.cookie_name)
        .ok_or_else(|| ApiError::unauthorized("Missing session"))?;
    let entry = lookup_session(state.sessions.as_ref(), &id, state.sink.as_ref())
        .await
        .ok_or_else(|| ApiError::unauthorized("No authorization context for session"))?;

    if state.policy.requires_scoping(&entry.account) {
        Ok(Some(entry.account))
    } else {
        tracing::debug!(session_id = %id, "tenant scoping bypassed");
        Ok(None)
    }
}

pub async fn filtered_msearch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = match scoping_context(&state, &headers).await? {
        Some(context) => {
            let payload = std::str::from_utf8(&body)
                .map_err(|_| ApiError::bad_request("Multi-search body is not UTF-8"))?;
            Bytes::from(state.scoper.scope_msearch(payload, &context)?)
        }
        None => body,
    };
    let response = state
        .upstream
        .forward(Method::POST, "/elasticsearch/_msearch", &headers, body)
        .await?;
    Ok(response.into_response())
}

pub async fn filtered_search(
    State(state): State<AppState>,
    Path(index): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let index = checked_index(&index)?;
    let body = scope_body(&state, &headers, QueryShape::Search, body).await?;
    let response = state
        .upstream
        .forward(Method::POST, &format!("/elasticsearch/{index}/_search"), &headers, body)
        .await?;
    Ok(response.into_response())
}

pub async fn filtered_internal_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = scope_body(&state, &headers, QueryShape::InternalSearch, body).await?;
    let response = state
        .upstream
        .forward(Method::POST, "/internal/search/es", &headers, body)
        .await?;
    Ok(response.into_response())
}

/// Suggestion failures upstream degrade to an empty suggestion list
pub async fn filtered_suggestions(
    State(state): State<AppState>,
    Path(index): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let index = checked_index(&index)?;
    let body = scope_body(&state, &headers, QueryShape::Suggestions, body).await?;
    let response = state
        .upstream
        .forward(
            Method::POST,
            &format!("/api/kibana/suggestions/values/{index}"),
            &headers,
            body,
        )
        .await?;

    if response.status.as_u16() > 399 {
        state.sink.log(
            EventLevel::Error,
            &["error", "authentication", "session:get:_filtered_suggestions"],
            &format!(
                "suggestions upstream returned {}: {}",
                response.status,
                String::from_utf8_lossy(&response.body)
            ),
        );
        return Ok((StatusCode::OK, Json(json!([]))).into_response());
    }
    Ok(response.into_response())
}

async fn scope_body(
    state: &AppState,
    headers: &HeaderMap,
    shape: QueryShape,
    body: Bytes,
) -> Result<Bytes, ApiError> {
    match scoping_context(state, headers).await? {
        Some(context) => Ok(Bytes::from(state.scoper.scope_body(shape, &body, &context)?)),
        None => Ok(body),
    }
}

/// Forwards any other allowed or unclassified request verbatim
pub async fn passthrough(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.settings.max_request_size_bytes)
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let response = state
        .upstream
        .forward(parts.method, path_and_query, &parts.headers, body)
        .await?;
    Ok(response.into_response())
}
