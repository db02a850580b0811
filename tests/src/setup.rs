//! Common test setup functions.

use axum::Router;
use scanlog_api::{router, AppState};
use scanlog_core::LogRecord;
use scanlog_store::{MemoryCounters, MemorySheet};
use std::sync::Arc;

/// Test context running the real router against in-memory stores.
///
/// The in-memory sheet implements the same `LogSheet` trait as the
/// file-backed one, so requests exercise the production code paths
/// end to end while tests can inspect the appended rows directly.
pub struct TestContext {
    pub sheet: Arc<MemorySheet>,
    pub counters: Arc<MemoryCounters>,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let sheet = Arc::new(MemorySheet::new("测试表"));
        let counters = Arc::new(MemoryCounters::new());

        let state = AppState::new(sheet.clone());
        let router = router(state);

        Self {
            sheet,
            counters,
            router,
        }
    }

    /// Rows currently in the sheet, oldest first.
    pub fn rows(&self) -> Vec<LogRecord> {
        self.sheet.rows()
    }

    pub fn row_count(&self) -> usize {
        self.sheet.rows().len()
    }

    /// Make the sheet fail every operation (for error testing).
    pub fn set_sheet_failure(&self, fail: bool) {
        self.sheet.set_should_fail(fail);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
