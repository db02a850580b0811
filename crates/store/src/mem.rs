//! In-memory log sheet for tests and development.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use scanlog_core::{Error, LogRecord, Result};

use crate::sheet::LogSheet;

/// Log sheet held entirely in memory.
///
/// Implements the same [`LogSheet`] trait as [`crate::FileSheet`], so the
/// full router and workers run against it unchanged. The failure toggle
/// exercises the `StoreUnavailable` paths.
#[derive(Clone)]
pub struct MemorySheet {
    name: String,
    rows: Arc<Mutex<Vec<LogRecord>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Pre-populates the sheet, oldest first.
    pub fn seed(&self, rows: Vec<LogRecord>) {
        self.rows.lock().extend(rows);
    }

    /// All rows currently in the sheet.
    pub fn rows(&self) -> Vec<LogRecord> {
        self.rows.lock().clone()
    }

    pub fn clear(&self) {
        self.rows.lock().clear();
    }

    /// Makes every subsequent operation fail with `StoreUnavailable`.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    fn check_available(&self) -> Result<()> {
        if *self.should_fail.lock() {
            Err(Error::store("sheet unavailable (simulated)"))
        } else {
            Ok(())
        }
    }
}

impl Default for MemorySheet {
    fn default() -> Self {
        Self::new("内存表")
    }
}

#[async_trait]
impl LogSheet for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append_rows(&self, new_rows: Vec<LogRecord>) -> Result<usize> {
        self.check_available()?;
        let appended = new_rows.len();
        self.rows.lock().extend(new_rows);
        Ok(appended)
    }

    async fn data_row_count(&self) -> Result<usize> {
        self.check_available()?;
        Ok(self.rows.lock().len())
    }

    async fn read_all(&self) -> Result<Vec<LogRecord>> {
        self.check_available()?;
        Ok(self.rows.lock().clone())
    }

    async fn delete_oldest(&self, n: usize) -> Result<usize> {
        self.check_available()?;
        let mut rows = self.rows.lock();
        let n = n.min(rows.len());
        rows.drain(..n);
        Ok(n)
    }
}
