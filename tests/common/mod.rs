#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

/// Serve `app` on a free local port and return its base URL once it accepts connections
pub async fn spawn(app: Router) -> Result<String> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while tokio::net::TcpStream::connect(&addr).await.is_err() {
        if Instant::now() > deadline {
            anyhow::bail!("server on {} did not come up", addr);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Ok(format!("http://{}", addr))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case(&format!("bearer {TOKEN}")))
        .unwrap_or(false)
}

fn v2_resources(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({
            "metadata": {"guid": format!("{prefix}-{i}"), "created_at": "2020-01-01T00:00:00Z"},
            "entity": {"name": format!("{prefix}-name-{i}"), "status": "active"}
        }))
        .collect()
}

fn v3_resources(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"guid": format!("{prefix}-{i}"), "name": format!("{prefix}-name-{i}"), "suspended": false}))
        .collect()
}

async fn platform_page(
    State(base): State<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response();
    }
    let path = request.uri().path().to_string();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);

    let body = if path.starts_with("/v2/") {
        if !params.contains_key("results-per-page") {
            return (StatusCode::BAD_REQUEST, "missing results-per-page").into_response();
        }
        match (path.as_str(), page) {
            ("/v2/page1.json", _) => json!({"next_url": "/v2/page2.json", "resources": v2_resources("a", 5)}),
            ("/v2/page2.json", _) => json!({"next_url": "/v2/page3.json", "resources": v2_resources("b", 5)}),
            ("/v2/page3.json", _) => json!({"next_url": null, "resources": v2_resources("c", 3)}),
            ("/v2/organizations", 1) => json!({
                "next_url": "/v2/organizations?page=2",
                "resources": [{"metadata": {"guid": "org-1"}, "entity": {"name": "acme"}}]
            }),
            ("/v2/organizations", 2) => json!({
                "next_url": null,
                "resources": [{"metadata": {"guid": "org-2"}, "entity": {"name": "sandbox"}}]
            }),
            ("/v2/spaces", _) => json!({
                "next_url": null,
                "resources": [
                    {"metadata": {"guid": "space-1"}, "entity": {"name": "dev"}},
                    {"metadata": {"guid": "space-2"}, "entity": {"name": "prod"}}
                ]
            }),
            _ => return StatusCode::NOT_FOUND.into_response(),
        }
    } else {
        if !params.contains_key("per_page") {
            return (StatusCode::BAD_REQUEST, "missing per_page").into_response();
        }
        let next = |p: &str| json!({"href": format!("{base}{p}")});
        match path.as_str() {
            "/v3/page1.json" => json!({"pagination": {"next": next("/v3/page2.json")}, "resources": v3_resources("a", 5)}),
            "/v3/page2.json" => json!({"pagination": {"next": next("/v3/page3.json")}, "resources": v3_resources("b", 5)}),
            "/v3/page3.json" => json!({"pagination": {"next": null}, "resources": v3_resources("c", 3)}),
            _ => return StatusCode::NOT_FOUND.into_response(),
        }
    };
    Json(body).into_response()
}

async fn userinfo(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "user_id": "user-1",
        "user_name": "ann",
        "name": "Ann Example",
        "email": "ann@example.com"
    }))
    .into_response()
}

/// Platform API and identity provider stand-in
pub async fn spawn_platform() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base = format!("http://127.0.0.1:{}", port);
    let app = Router::new()
        .route("/userinfo", get(userinfo))
        .fallback(platform_page)
        .with_state(base.clone());

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(base)
}

/// Echoes every request back as JSON so tests can inspect what was forwarded
async fn echo(request: Request) -> Response {
    let method = request.method().to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();

    if path_and_query.starts_with("/api/kibana/suggestions/values/broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "index not found").into_response();
    }

    let bytes: Bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::String(text));

    Json(json!({
        "method": method,
        "path": path_and_query,
        "headers": headers,
        "body": body,
    }))
    .into_response()
}

/// Dashboard application stand-in
pub async fn spawn_dashboard() -> Result<String> {
    spawn(Router::new().fallback(echo)).await
}
