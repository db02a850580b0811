//! Size limits and bookkeeping constants for the scan log service.
//!
//! The sheet cap and daily quota mirror the limits of the hosted
//! deployment the sheet was migrated from; the batch guards bound memory
//! for a single request.

// === Sheet limits ===

/// Maximum data rows retained in the log sheet (header row excluded).
///
/// The retention trimmer deletes the oldest rows beyond this cap.
pub const MAX_DATA_ROWS: usize = 1000;

/// Header occupies row 1; data rows start at row 2.
///
/// Carried over from the spreadsheet model the sheet file emulates.
pub const FIRST_DATA_ROW: usize = 2;

// === Batch limits ===

/// Maximum request payload size in bytes (1MB).
pub const MAX_BATCH_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum records per batch.
pub const MAX_BATCH_RECORDS: usize = 1000;

// === Quota bookkeeping ===

/// Soft daily invocation ceiling. Advisory only, never enforced.
pub const DAILY_QUOTA: u32 = 360;

/// First warning tier: usage above this fraction of the quota.
pub const QUOTA_WARN_RATIO: f64 = 0.70;

/// Stronger warning tier: fewer than this many invocations remain.
pub const QUOTA_CRITICAL_MARGIN: u32 = 60;

/// Days a per-day counter entry is kept before eviction.
pub const COUNTER_RETENTION_DAYS: i64 = 7;

// === Backups ===

/// Days a dated backup snapshot is kept before pruning.
pub const BACKUP_RETENTION_DAYS: i64 = 30;
