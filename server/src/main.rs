use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use parley_gateway::{build_router, AppState};
use parley_relay::Relay;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "parley", about = "Room-scoped real-time chat relay")]
struct Cli {
    /// Override the configured bind address
    #[arg(long)]
    address: Option<String>,
    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("starting Parley relay");

    let cli = Cli::parse();
    let mut config = parley_config::load().context("failed to load configuration")?;
    if let Some(address) = cli.address {
        config.http.address = address;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }

    let relay = Arc::new(Relay::new(config.relay.send_buffer));
    let app = build_router(AppState::new(relay));

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("relay shut down");
    Ok(())
}

fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    async {
        if let Err(error) = signal::ctrl_c().await {
            error!(?error, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    }
}
