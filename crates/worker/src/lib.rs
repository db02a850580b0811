//! Background workers for the scan log service.
//!
//! Each worker is one idempotent pass invoked on an interval:
//! - Trim (caps the sheet at its maximum row count)
//! - Backup (dated snapshot of the full sheet, with pruning)
//! - Quota (per-day invocation counter with advisory warnings)

pub mod backup;
pub mod quota;
pub mod scheduler;
pub mod trim;

pub use backup::{BackupResult, BackupWorker};
pub use quota::{QuotaCounter, UsageStatus};
pub use scheduler::{WorkerConfig, WorkerScheduler};
pub use trim::{TrimResult, TrimWorker};
