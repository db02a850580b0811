//! Application state shared across handlers.

use scanlog_store::LogSheet;
use std::sync::Arc;

/// Shared application state.
///
/// Only the log sheet; the quota counter is deliberately not here. It is
/// advisory bookkeeping run by the worker scheduler and never consulted
/// on the ingest path.
#[derive(Clone)]
pub struct AppState {
    /// The append-only log sheet (file-backed in production, memory in tests)
    pub sheet: Arc<dyn LogSheet>,
}

impl AppState {
    pub fn new(sheet: Arc<dyn LogSheet>) -> Self {
        Self { sheet }
    }
}
