use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use neuroscan::api::server;
use neuroscan::config::{self, Settings};
use neuroscan::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        port = settings.port,
        simulation = settings.simulation_mode(),
        "Starting {}",
        config::APP_NAME
    );

    let state = Arc::new(AppState::new(settings)?);

    // Warm the database so migration failures surface at startup.
    if let Err(e) = state.open_db() {
        tracing::error!(error = %e, "Database initialization failed");
        return Err(std::io::Error::other(e.to_string()));
    }

    server::serve(state).await
}
