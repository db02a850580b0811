//! Scan log ingestion service
//!
//! Single-tenant append log for barcode scans:
//! - HTTP ingest with JSON and JSONP response encodings
//! - File-backed log sheet with header row and ordered data rows
//! - Background workers for retention trimming, dated backups, and
//!   soft daily quota bookkeeping

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use scanlog_api::{router, AppState};
use scanlog_store::{CounterStore, FileCounters, FileSheet, LogSheet, StoreConfig};
use scanlog_telemetry::{health, init_tracing_from_env, metrics};
use scanlog_worker::{WorkerConfig, WorkerScheduler};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    store: StoreConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting scan log service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    info!(
        data_dir = %config.store.data_dir.display(),
        sheet = %config.store.sheet_name,
        "Loaded store config"
    );

    // Open the file-backed stores
    let sheet: Arc<dyn LogSheet> = match FileSheet::open(&config.store) {
        Ok(sheet) => {
            health().sheet.set_healthy();
            Arc::new(sheet)
        }
        Err(e) => {
            health().sheet.set_unhealthy(e.to_string());
            return Err(e).context("Failed to open log sheet");
        }
    };

    let counters: Arc<dyn CounterStore> = match FileCounters::open(&config.store) {
        Ok(counters) => {
            health().counters.set_healthy();
            Arc::new(counters)
        }
        Err(e) => {
            health().counters.set_unhealthy(e.to_string());
            return Err(e).context("Failed to open counter store");
        }
    };

    if let Ok(count) = sheet.data_row_count().await {
        metrics().sheet_rows.set(count as u64);
        info!(data_rows = count, "Log sheet ready");
    }

    // Start background workers
    let scheduler = Arc::new(WorkerScheduler::new(
        WorkerConfig::default(),
        sheet.clone(),
        counters.clone(),
        config.store.backup_dir.clone(),
    ));
    let _worker_handles = scheduler.start();

    // Create application state and router
    let state = AppState::new(sheet);
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SCANLOG")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested store config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(data_dir) = std::env::var("SCANLOG_STORE_DATA_DIR") {
        config.store.data_dir = data_dir.into();
    }
    if let Ok(sheet_name) = std::env::var("SCANLOG_STORE_SHEET_NAME") {
        config.store.sheet_name = sheet_name;
    }
    if let Ok(backup_dir) = std::env::var("SCANLOG_STORE_BACKUP_DIR") {
        config.store.backup_dir = backup_dir.into();
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!("Failed to install signal handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
