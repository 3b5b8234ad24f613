use std::path::PathBuf;

use clap::Parser;
use meowfacts_server::{serve, AppState, Overrides, RelayConfig};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "meowfacts-server", version, about = "Relay between the cat facts form and the Meow Facts API")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(long)]
    bind: Option<String>,

    /// Base URL of the remote fact service.
    #[arg(long)]
    upstream: Option<String>,

    /// Timeout for the outbound call, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RelayConfig::load(path)?,
        None => RelayConfig::default(),
    }
    .with_overrides(Overrides {
        bind_address: cli.bind,
        base_url: cli.upstream,
        timeout_ms: cli.timeout_ms,
    })?;

    meowfacts_server::logging::init(&config.logging.filter)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        timeout_ms = config.upstream.timeout_ms,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.bind_addr()?).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
