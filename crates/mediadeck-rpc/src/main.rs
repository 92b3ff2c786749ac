//! MediaDeck RPC Server - JSON-RPC backend for the media dashboard.
//!
//! This binary loads the configuration, starts the move server from
//! `mediadeck-core` and exposes it as a JSON-RPC 2.0 endpoint.

mod handlers;
mod server;
mod wrapper;

use anyhow::{Context, Result};
use clap::Parser;
use mediadeck_core::{MediaDeckConfig, MoveServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mediadeck-rpc")]
#[command(about = "JSON-RPC server for the mediadeck download dashboard")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting MediaDeck RPC Server");

    let config = MediaDeckConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    info!("Source directory: {}", config.source_dir.display());

    let server = Arc::new(MoveServer::builder(config).build()?);
    server.start().await?;

    let addr = server::start_server(server.clone(), &args.host, args.port).await?;

    // Print port for the dashboard launcher to read (intentional stdout)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");
    server.shutdown();

    Ok(())
}
