mod cli;

use crate::cli::{LogFormat, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use shortlink_core::Shortener;
use shortlink_gateway::{App, AppState};
use shortlink_shortener::{ShortenerService, ShortenerSettings};
use shortlink_storage::{InMemoryBackend, KeyLayout, RedisBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        storage_timeout_ms = config.storage_timeout_ms,
        "starting shortlink gateway"
    );

    let settings = ShortenerSettings::builder()
        .storage_timeout(Duration::from_millis(config.storage_timeout_ms))
        .build();

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(ShortenerService::with_settings(
            InMemoryBackend::new(),
            settings,
        )),
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .context("redis url is required when storage backend is redis")?;
            let backend =
                RedisBackend::connect(&redis_url, KeyLayout::with_prefix(config.redis_key_prefix))
                    .await
                    .context("failed to connect to Redis")?;
            Arc::new(ShortenerService::with_settings(backend, settings))
        }
    };

    let app = App::router(AppState::new(shortener));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
