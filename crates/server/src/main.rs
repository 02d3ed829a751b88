//! respcache admin server entry point.
//!
//! Boots an MCP server on stdio transport that lets operators inspect and
//! invalidate the response cache. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use respcache_core::{AppConfig, CacheDb, ResponseCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let db = CacheDb::open_with(&config.db_path, config.store_options())
        .await
        .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;
    let cache = ResponseCache::from_config(db, &config);

    tracing::info!(
        db_path = %config.db_path.display(),
        durability = ?config.durability,
        "Starting respcache admin server on stdio transport"
    );

    let handler = handler::AdminServer::new(cache, config.freshness());
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
