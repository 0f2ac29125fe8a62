//! mcp-unfurl server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unfurl_client::TitleResolver;
use unfurl_core::{AppConfig, CacheDb};

mod handler;
mod sweeper;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), "Starting mcp-unfurl server on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let resolver = Arc::new(TitleResolver::new(db.clone(), &config)?);
    let sweeper = sweeper::spawn(db.clone(), config.retention(), config.sweep_interval());

    let handler = handler::UnfurlServer::new(resolver, db, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;
    sweeper.abort();

    Ok(())
}
