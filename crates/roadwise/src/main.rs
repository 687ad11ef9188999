mod api;
mod cache;
mod config;
mod error;
mod reload;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::SuggestionCache;
use config::Config;
use reload::ReloadService;
use server::RoadwiseServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting roadwise MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        kb_path = %config.kb_path,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Connect to Redis (optional — graceful degradation if unavailable)
    let cache = Arc::new(SuggestionCache::connect(config.redis_url.as_deref()));
    if cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }

    // 3. Load the knowledge base and build the engine
    let reload_service = Arc::new(ReloadService::new(config));
    let (engine, fingerprint) = reload_service.rebuild()?;
    info!(
        records = engine.kb().len(),
        "knowledge base loaded"
    );

    // 4. Build MCP server and serve on stdio
    let server = RoadwiseServer::new(engine, fingerprint, cache, reload_service);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
