pub mod api; // HTTP surface
pub mod appointments;
pub mod billing;
pub mod config;
pub mod conflict; // Double-booking guard
pub mod core_state;
pub mod db;
pub mod departments;
pub mod error;
pub mod identity;
pub mod models;
pub mod ratings;
pub mod validation;
pub mod visibility; // Role-scoped reads

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Anything that stops the service from coming up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Cannot listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::Config::from_env()?;
    let core = Arc::new(core_state::CoreState::new(config.db_path.clone()));
    core.initialize()?;

    let server = api::start_api_server_on(core, config.bind_addr, config.cors_origin.clone()).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    tracing::info!("Shutdown requested");
    server.stop().await;
    Ok(())
}
