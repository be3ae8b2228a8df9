use clap::Parser;
use gp_result::GpConfig;
use gpd::{
    api::{ApiState, serve},
    cli::Cli,
    prelude::*,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the gp service.
///
/// Initializes logging, loads the configuration and serves the API until a
/// shutdown signal is received.
///
/// # Examples
///
/// ```bash
/// gpd --config gp.toml
/// GPD_BIND=0.0.0.0:8080 gpd
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GpConfig::from_file(path)?,
        None => GpConfig::default(),
    };
    let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    serve(listener, ApiState::new(config), async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down");
    })
    .await
}
