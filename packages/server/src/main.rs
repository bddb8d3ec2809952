use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tuneful_common::storage::filesystem::FilesystemUploadStore;
use tuneful_server::config::AppConfig;
use tuneful_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = tuneful_server::database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let uploads = FilesystemUploadStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to initialize upload directory")?;
    info!(
        upload_dir = %config.storage.upload_dir.display(),
        max_upload_size = config.storage.max_upload_size,
        "Upload store ready"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;
    let public_url = config.server.base_url();

    let state = AppState {
        db,
        uploads: Arc::new(uploads),
        config,
    };
    let app = tuneful_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{} (public URL {})", addr, public_url);
    info!("API docs at {}/swagger-ui", public_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
