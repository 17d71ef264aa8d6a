//! `switchboard` binary: loads configuration and serves the HTTP API.

use clap::Parser;
use eyre::WrapErr;
use std::sync::Arc;
use switchboard::config::{AppConfig, Cli};
use switchboard::context::ServiceContext;
use switchboard::mcp_client::adapters::TransportConnector;
use switchboard::telemetry::{self, LogFormat};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let lookup = |key: &str| std::env::var(key).ok();

    telemetry::init(LogFormat::from_lookup(lookup)).wrap_err("failed to install logging")?;
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = AppConfig::load(cli.config.as_deref(), lookup)
        .wrap_err("failed to load configuration")?
        .with_cli(&cli);
    let context = Arc::new(
        ServiceContext::from_config(&config, Arc::new(TransportConnector::new()))
            .wrap_err("failed to build services")?,
    );
    info!(
        agents = config.agents().len(),
        servers = config.servers().len(),
        demo_mode = config.demo_mode(),
        "services ready"
    );

    let listener = tokio::net::TcpListener::bind(config.bind())
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind()))?;
    info!(address = %config.bind(), "listening");

    axum::serve(listener, switchboard::http::router(Arc::clone(&context)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    context.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown requested");
}
