//! The log sheet capability.

use async_trait::async_trait;
use scanlog_core::{LogRecord, Result};

/// Append-only log table, ordered oldest first.
///
/// Row 1 of the persisted form is the header; "data rows" counts exclude it.
/// Implementations serialize all mutations internally, so a batch append
/// and a trim never interleave.
#[async_trait]
pub trait LogSheet: Send + Sync {
    /// Display name of the sheet.
    fn name(&self) -> &str;

    /// Appends records at the end, preserving input order.
    /// Returns the number of rows appended.
    async fn append_rows(&self, rows: Vec<LogRecord>) -> Result<usize>;

    /// Number of data rows currently in the sheet.
    async fn data_row_count(&self) -> Result<usize>;

    /// All data rows, oldest first. Used by stats and backups.
    async fn read_all(&self) -> Result<Vec<LogRecord>>;

    /// Deletes the `n` oldest data rows as a single logical step.
    /// Returns how many rows were actually deleted.
    async fn delete_oldest(&self, n: usize) -> Result<usize>;
}
