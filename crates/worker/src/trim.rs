//! Retention trimmer.
//!
//! Caps the log sheet at a maximum number of data rows by deleting the
//! oldest excess rows. The header row is never touched; deletion is one
//! logical step inside the store, so a failed run leaves the sheet intact.

use std::sync::Arc;
use tracing::{debug, info};

use scanlog_core::{limits::MAX_DATA_ROWS, Result};
use scanlog_store::LogSheet;
use scanlog_telemetry::metrics;

/// Outcome of one trim pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimResult {
    /// Rows deleted; zero when the sheet was within its cap.
    pub deleted: usize,
}

/// Worker that enforces the row cap on the log sheet.
pub struct TrimWorker {
    sheet: Arc<dyn LogSheet>,
    max_data_rows: usize,
}

impl TrimWorker {
    pub fn new(sheet: Arc<dyn LogSheet>) -> Self {
        Self::with_cap(sheet, MAX_DATA_ROWS)
    }

    pub fn with_cap(sheet: Arc<dyn LogSheet>, max_data_rows: usize) -> Self {
        Self {
            sheet,
            max_data_rows,
        }
    }

    /// Runs one trim pass. Idempotent: a second run right after a
    /// successful one deletes nothing.
    pub async fn run(&self) -> Result<TrimResult> {
        let current = self.sheet.data_row_count().await?;

        if current <= self.max_data_rows {
            debug!(
                data_rows = current,
                cap = self.max_data_rows,
                "Sheet within cap, nothing to trim"
            );
            return Ok(TrimResult { deleted: 0 });
        }

        let excess = current - self.max_data_rows;
        let deleted = self.sheet.delete_oldest(excess).await?;
        metrics().rows_trimmed.inc_by(deleted as u64);
        metrics().sheet_rows.set((current - deleted) as u64);

        info!(
            deleted = deleted,
            remaining = current - deleted,
            cap = self.max_data_rows,
            "Trimmed old scan records"
        );

        Ok(TrimResult { deleted })
    }
}
