//! Serve command - runs the team HTTP API

use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router;
use crate::config::ServerConfig;

/// Run the team server until interrupted
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let state = crate::create_app_state(&config).await?;
    let app = create_router(state);

    let addr = build_socket_addr(&config.server)?;
    info!("Starting team server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Team server stopped");
    Ok(())
}

fn build_socket_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((server.host.parse::<IpAddr>()?, server.port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
