// gemvision - Single-page Gemini vision chat

use anyhow::Result;
use clap::Parser;
use gemvision::cli::Args;
use gemvision::config::AppConfig;
use gemvision::gemini::GeminiClient;
use gemvision::server::create_router;
use gemvision::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load()?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting gemvision v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the Gemini client. A missing key keeps the server up
    // with submission disabled rather than aborting startup.
    let gemini_client = match GeminiClient::new(&config.gemini) {
        Ok(client) => {
            info!("Gemini client ready, model: {}", client.model());
            Some(client)
        }
        Err(e) => {
            warn!("{} Submission will be disabled.", e);
            None
        }
    };

    // Phase 3.5: Handle --check flag (connectivity probe)
    if args.check {
        return run_check(gemini_client.as_ref()).await;
    }

    // Phase 4: Build and start HTTP server
    let app = create_router(config.clone(), gemini_client)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn run_check(client: Option<&GeminiClient>) -> Result<()> {
    let client = client.ok_or_else(|| {
        anyhow::anyhow!("Cannot probe connectivity without an API key")
    })?;
    let latency = client.check_connectivity().await?;
    info!("Gemini API reachable, round trip {:?}", latency);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
