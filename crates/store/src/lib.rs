//! Persistence layer for the scan log service.
//!
//! The original deployment wrote into an ambient spreadsheet handle; here
//! that becomes two explicit capabilities passed into handlers and workers:
//! [`LogSheet`] for the append-only log table and [`CounterStore`] for the
//! per-day invocation counters. File-backed implementations serve
//! production, in-memory ones serve tests and dev mode.

pub mod config;
pub mod counter;
pub mod file;
pub mod mem;
pub mod sheet;

pub use config::StoreConfig;
pub use counter::{CounterStore, FileCounters, MemoryCounters};
pub use file::FileSheet;
pub use mem::MemorySheet;
pub use sheet::LogSheet;
