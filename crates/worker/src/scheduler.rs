//! Worker scheduler for background tasks.
//!
//! Replaces the time-based triggers of the original deployment: each
//! worker is driven by an independent interval ticker and each tick is a
//! single atomic pass.

use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use scanlog_store::{CounterStore, LogSheet};
use scanlog_telemetry::metrics;

use crate::backup::BackupWorker;
use crate::quota::QuotaCounter;
use crate::trim::TrimWorker;

/// Worker scheduler configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Trim check interval
    pub trim_interval: Duration,
    /// Backup snapshot interval
    pub backup_interval: Duration,
    /// Quota check interval
    pub quota_interval: Duration,
    /// Metrics snapshot logging interval
    pub metrics_log_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            trim_interval: Duration::from_secs(3600),        // 1 hour
            backup_interval: Duration::from_secs(24 * 3600), // daily
            quota_interval: Duration::from_secs(3600),       // 1 hour
            metrics_log_interval: Duration::from_secs(300),  // 5 minutes
        }
    }
}

/// Background worker scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    sheet: Arc<dyn LogSheet>,
    counters: Arc<dyn CounterStore>,
    backup_dir: PathBuf,
}

impl WorkerScheduler {
    pub fn new(
        config: WorkerConfig,
        sheet: Arc<dyn LogSheet>,
        counters: Arc<dyn CounterStore>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            sheet,
            counters,
            backup_dir: backup_dir.into(),
        }
    }

    /// Starts all background workers.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_trim_worker().await;
        }));

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_backup_worker().await;
        }));

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_quota_worker().await;
        }));

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_metrics_log().await;
        }));

        info!("Background workers started");
        handles
    }

    async fn run_trim_worker(&self) {
        let worker = TrimWorker::new(self.sheet.clone());
        let mut ticker = interval(self.config.trim_interval);

        loop {
            ticker.tick().await;

            if let Err(e) = worker.run().await {
                error!("Trim worker error: {}", e);
            }
        }
    }

    async fn run_backup_worker(&self) {
        let worker = BackupWorker::new(self.sheet.clone(), self.backup_dir.clone());
        let mut ticker = interval(self.config.backup_interval);

        loop {
            ticker.tick().await;

            if let Err(e) = worker.run(Local::now().date_naive()).await {
                error!("Backup worker error: {}", e);
            }
        }
    }

    async fn run_quota_worker(&self) {
        let counter = QuotaCounter::new(self.counters.clone());
        let mut ticker = interval(self.config.quota_interval);

        loop {
            ticker.tick().await;

            if let Err(e) = counter.record_invocation(Local::now().date_naive()).await {
                error!("Quota check error: {}", e);
            }
        }
    }

    async fn run_metrics_log(&self) {
        let mut ticker = interval(self.config.metrics_log_interval);

        loop {
            ticker.tick().await;

            let snapshot = metrics().snapshot();
            info!(
                batches = snapshot.batches_received,
                records_appended = snapshot.records_appended,
                records_skipped = snapshot.records_skipped,
                malformed = snapshot.malformed_requests,
                sheet_rows = snapshot.sheet_rows,
                ingest_latency_mean_ms = snapshot.ingest_latency_mean_ms,
                "Metrics snapshot"
            );
        }
    }
}
