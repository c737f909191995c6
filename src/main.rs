//! Sentiment proxy HTTP server
//!
//! Starts an Axum web server that forwards review text to the sentiment
//! model service.

use clap::Parser;
use sentiment_proxy::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    credentials,
    handlers::{self, AppState},
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    // Load configuration (file if present, then environment overrides)
    let config = Config::load(&cli.config, |key| std::env::var(key).ok())?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        path = %cli.config,
        found = std::path::Path::new(&cli.config).exists(),
        "Configuration loaded"
    );
    tracing::info!(
        "Starting sentiment proxy {} on {}:{}",
        config.app.version,
        config.server.host,
        config.server.port
    );

    // Credential is read once; there is no reload
    let credential = credentials::load(&config.credentials.search_paths);

    let addr = config.server.bind_addr()?;

    let state = AppState::from_config(Arc::new(config), credential)?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
