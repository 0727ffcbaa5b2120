use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cf_scope_proxy::audit::TracingSink;
use cf_scope_proxy::config;
use cf_scope_proxy::proxy::{self, AppState};
use cf_scope_proxy::session::MemorySessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH_*, UPSTREAM_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting scope proxy in {:?} mode", config.environment);

    let state = AppState::from_config(
        config,
        Arc::new(MemorySessionStore::new()),
        Arc::new(TracingSink),
    )
    .context("invalid proxy configuration")?;

    let app = if config.api.enable_request_logging {
        proxy::traced_router(state)
    } else {
        proxy::router(state)
    };

    // Allow tests or deployments to override port via env
    let port = std::env::var("PROXY_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Scope proxy listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
