// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::auto_sync_service::AutoSyncService;
use crate::application::chart_board::ChartBoard;
use crate::application::import_service::ImportService;
use crate::application::settings_service::SettingsService;
use crate::domain::dataset::SeriesColor;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_pickers::DirectoryPicker;
use crate::infrastructure::simulated_folder::SimulatedFolderSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create the simulated folder source (infrastructure layer)
    let source = Arc::new(SimulatedFolderSource::from_settings(&config.sync));

    // Create services (application layer), one board per screen
    let auto_sync = AutoSyncService::new(
        source,
        Arc::new(ChartBoard::new("sync", config.sync.auto_refresh)),
        config.sync.interval(),
    );
    let import = ImportService::new(
        Arc::new(ChartBoard::new("import", false)),
        SeriesColor::BLUE,
    );
    let settings = SettingsService::new(
        config.connection.clone(),
        auto_sync.file_count(),
        auto_sync.interval().as_secs(),
    );

    // Mount the auto-sync screen: first load now, then on the interval
    let scheduler = auto_sync.start().await;

    let import_folder = DirectoryPicker::new(config.import.directory.clone());
    tracing::info!("Importing from {}", import_folder.directory().display());

    let state = Arc::new(AppState {
        auto_sync,
        import,
        settings,
        import_folder,
        layout: config.layout,
    });

    let router = build_router(state, config.import.max_upload_bytes);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting xls-chart-reader on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Unmount: no further scheduled refreshes
    scheduler.stop();
    tracing::info!("Auto-sync stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
