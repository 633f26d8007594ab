//! Image2URL MCP Server
//!
//! Run with: R2_ACCOUNT_ID=xxx R2_ACCESS_KEY_ID=xxx R2_SECRET_ACCESS_KEY=xxx \
//!   R2_BUCKET_NAME=xxx R2_PUBLIC_URL=xxx image2url-mcp [--transport http]

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use image2url_core::{Config, HttpRemoteClient};
use image2url_mcp::{http, telemetry, ImageService, ImageTools};
use image2url_storage::R2Storage;
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "image2url-mcp", version, about = "Image2URL MCP server")]
struct Cli {
    /// Transport to serve MCP over
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Port for the HTTP transport (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().context(
        "Invalid configuration. Set R2_ACCOUNT_ID, R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY, \
         R2_BUCKET_NAME and R2_PUBLIC_URL",
    )?;
    telemetry::init_tracing(config.is_production());

    let storage = R2Storage::new(&config.r2).context("Failed to configure R2 storage")?;
    let remote = HttpRemoteClient::new()?;
    let port = cli.port.unwrap_or(config.server_port);

    tracing::info!(
        bucket = %config.r2.bucket_name,
        public_url = %config.r2.public_url,
        environment = %config.environment,
        transport = ?cli.transport,
        "Starting Image2URL MCP server"
    );

    let tools = ImageTools::new(Arc::new(storage), Arc::new(remote), Arc::new(config));
    let service = ImageService::new(tools);

    match cli.transport {
        Transport::Stdio => {
            let running = service.serve(stdio()).await.context("MCP transport failed")?;
            running.waiting().await.context("MCP server error")?;
        }
        Transport::Http => http::serve(service, port).await?,
    }

    Ok(())
}
