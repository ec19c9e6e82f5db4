//! HTTP server lifecycle.

use std::sync::Arc;

use tracing::info;

use crate::api::router::api_router;
use crate::state::AppState;

/// Bind and serve until ctrl-c.
pub async fn serve(state: Arc<AppState>) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "NeuroScan API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    info!("Shutdown signal received");
}
