//! Press edge service entry point.

use clap::Parser;
use press_fetch::GitHubClient;
use press_server::{app, AppState, ServiceConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Press - GitHub content re-rendered as styled HTML
#[derive(Parser, Debug)]
#[command(name = "press-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTP listen address
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Owner of the repo the home and docs pages render
    #[arg(long, default_value = "collectedpress")]
    home_owner: String,

    /// Name of the repo the home and docs pages render
    #[arg(long, default_value = "press")]
    home_repo: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("press={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Press");

    let config = ServiceConfig {
        home_owner: args.home_owner,
        home_repo: args.home_repo,
    };
    let state = AppState::new(GitHubClient::new(), config)?;

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %args.listen, "Press is listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
