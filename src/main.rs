use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mcp_langfuse_bridge::{McpServer, load_settings, validate_settings};

/// MCP server exposing a Langfuse project's prompts and traces
#[derive(Debug, Parser)]
#[command(name = "mcp-langfuse-bridge", version, about)]
struct Cli {
    /// Directory for cached traces (overrides LANGFUSE_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr, stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let mut settings =
        load_settings().context("Failed to load Langfuse settings from the environment")?;

    if let Some(dir) = cli.cache_dir {
        settings.cache_dir = dir;
    }

    validate_settings(&settings).context("Invalid Langfuse settings")?;

    info!(
        base_url = %settings.base_url,
        cache_dir = %settings.cache_dir.display(),
        page_size = settings.page_size,
        "Configuration loaded"
    );

    let server = Arc::new(McpServer::new(settings));
    server.run().await?;

    Ok(())
}
