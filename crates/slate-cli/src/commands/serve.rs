//! `slate serve` command implementation.

use super::{ConfigArgs, open_store};
use anyhow::{Context, Result};
use clap::Args;
use slate_core::Transport;
use slate_mcp::{McpServer, ToolExecutor};
use tracing::info;

/// Arguments for `slate serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Transport type (stdio or http). Overrides config file.
    #[arg(long)]
    pub transport: Option<Transport>,

    /// HTTP port (only for http transport). Overrides config file.
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = args.config.load()?;

    // CLI overrides config file
    if let Some(transport) = args.transport {
        config.mcp.transport = transport;
    }
    if let Some(port) = args.port {
        config.mcp.port = port;
    }

    let location = args.config.storage_location(&config)?;
    let store = open_store(&location, &config).await?;

    info!(
        transport = %config.mcp.transport,
        database = %location.to_url(),
        max_rows = config.query.max_rows,
        "Starting Slate MCP server"
    );

    let executor = ToolExecutor::new(store.clone(), &config.query);
    let server = McpServer::new(config.mcp.clone(), executor);
    let outcome = server.run().await.context("MCP server failed");

    store.close().await;
    outcome
}
