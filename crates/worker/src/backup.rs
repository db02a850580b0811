//! Dated backup snapshots of the log sheet.
//!
//! Each run writes the full sheet (header included) to
//! `<backup_dir>/快递扫码备份_YYYY-MM-DD`, overwriting that day's file if
//! present, then prunes backups past the retention window. Backup dates
//! come from the file name, not filesystem mtimes.

use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use scanlog_core::{limits::BACKUP_RETENTION_DAYS, Result, SHEET_HEADER};
use scanlog_store::LogSheet;
use scanlog_telemetry::metrics;

/// File name prefix for dated snapshots, carried over from the sheet the
/// service replaced.
const BACKUP_PREFIX: &str = "快递扫码备份_";

/// Outcome of one backup pass.
#[derive(Debug, Clone)]
pub struct BackupResult {
    /// Path of the snapshot written.
    pub file: PathBuf,
    /// Data rows in the snapshot.
    pub rows: usize,
    /// Old snapshots deleted by the pruning step.
    pub pruned: usize,
}

/// Worker that snapshots the sheet and prunes old snapshots.
pub struct BackupWorker {
    sheet: Arc<dyn LogSheet>,
    backup_dir: PathBuf,
}

impl BackupWorker {
    pub fn new(sheet: Arc<dyn LogSheet>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheet,
            backup_dir: backup_dir.into(),
        }
    }

    /// Runs one backup pass for `today`.
    pub async fn run(&self, today: NaiveDate) -> Result<BackupResult> {
        fs::create_dir_all(&self.backup_dir)?;

        let rows = self.sheet.read_all().await?;
        let file_name = format!("{}{}", BACKUP_PREFIX, today.format("%Y-%m-%d"));
        let path = self.backup_dir.join(&file_name);

        let mut file = File::create(&path)?;
        writeln!(file, "{}", serde_json::to_string(&SHEET_HEADER)?)?;
        for row in &rows {
            writeln!(file, "{}", serde_json::to_string(&row.cells())?)?;
        }
        file.sync_all()?;

        let pruned = self.prune(today)?;
        metrics().backups_written.inc();

        info!(
            file = %path.display(),
            rows = rows.len(),
            pruned = pruned,
            "Backup snapshot written"
        );

        Ok(BackupResult {
            file: path,
            rows: rows.len(),
            pruned,
        })
    }

    /// Deletes snapshots dated before the retention cutoff.
    fn prune(&self, today: NaiveDate) -> Result<usize> {
        let cutoff = today - chrono::Duration::days(BACKUP_RETENTION_DAYS);
        let mut pruned = 0;

        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(date_str) = name.strip_prefix(BACKUP_PREFIX) else {
                continue;
            };

            match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                Ok(date) if date < cutoff => {
                    fs::remove_file(entry.path())?;
                    pruned += 1;
                }
                Ok(_) => {}
                Err(_) => {
                    warn!(file = name, "Backup file with unparseable date, leaving it");
                }
            }
        }

        Ok(pruned)
    }
}
