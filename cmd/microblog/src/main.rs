//! # Microblog Binary
//!
//! Loads settings, opens the account files, and serves the blog over HTTP.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{router, AppState};
use configs::{LogFormat, LogSettings, Settings};
use services::UserDirectory;
use storage_adapters::JsonAccountStore;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    let store = JsonAccountStore::open(&settings.storage.accounts_dir)
        .await
        .with_context(|| {
            format!(
                "opening accounts directory {}",
                settings.storage.accounts_dir.display()
            )
        })?;
    let directory = UserDirectory::open(Arc::new(store))
        .await
        .context("loading accounts")?;
    if directory.is_empty().await {
        info!(dir = %settings.storage.accounts_dir.display(), "no accounts yet");
    } else {
        info!(users = directory.len().await, "accounts ready");
    }

    if !settings.storage.images_dir.is_dir() {
        warn!(dir = %settings.storage.images_dir.display(), "images directory missing");
    }

    let app = router(
        AppState::new(Arc::new(directory)),
        &settings.storage.images_dir,
    );

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "microblog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

/// `RUST_LOG` wins over the configured filter when set.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match log.format {
        LogFormat::Json => fmt().with_env_filter(filter).json().try_init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
