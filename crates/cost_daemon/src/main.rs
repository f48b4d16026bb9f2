use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "cost_daemon", about = "HTTP costing service")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// Allowed CORS origin for the browser front end.
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
    /// Pricing constants JSON file. Built-in defaults when omitted.
    #[arg(long)]
    constants: Option<PathBuf>,
    /// Override one constant, e.g. --set market_threshold_per_kg=0.75. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let constants = cost_config::resolve_constants(cli.constants.as_deref(), &cli.overrides)?;
    tracing::info!(?constants, "pricing constants loaded");

    let cors_origin: HeaderValue = cli
        .cors_origin
        .parse()
        .with_context(|| format!("invalid --cors-origin: {}", cli.cors_origin))?;
    let app = routes::make_router_with_cors(AppState::new(constants), cors_origin);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.bind, cli.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("cost_daemon listening on http://{addr}");

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
