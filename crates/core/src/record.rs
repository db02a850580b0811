//! Scan record types and payload parsing.
//!
//! The wire format is the camelCase shape the browser scanning page sends:
//! `{ "expressType": "...", "processedCode": "...", "originalCode": "..." }`,
//! either as a bare object or as an array of objects.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Column headers of the log sheet, in persisted order.
pub const SHEET_HEADER: [&str; 4] = ["时间", "快递公司", "处理后条码", "原始条码"];

/// A raw record as received from the scanning page. All fields optional;
/// validation happens when the record is turned into a [`LogRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    /// Express carrier identifier (e.g. "UPS", "顺丰速运").
    pub express_type: Option<String>,
    /// Barcode value after client-side normalization.
    pub processed_code: Option<String>,
    /// Pre-normalization barcode value, if the page kept it.
    pub original_code: Option<String>,
}

/// One row of the append-only log sheet. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Capture time, locale-formatted, assigned server-side at append time.
    pub timestamp: String,
    pub carrier: String,
    pub processed_code: String,
    /// Empty string when the page did not supply an original code.
    pub original_code: String,
}

impl LogRecord {
    /// Validates a raw record and stamps it with the capture time.
    ///
    /// Returns `None` when carrier or processed code is missing or empty;
    /// the caller skips such records without aborting the batch.
    pub fn from_raw(raw: RawRecord, timestamp: String) -> Option<Self> {
        let carrier = raw.express_type.filter(|s| !s.is_empty())?;
        let processed_code = raw.processed_code.filter(|s| !s.is_empty())?;

        Some(Self {
            timestamp,
            carrier,
            processed_code,
            original_code: raw.original_code.unwrap_or_default(),
        })
    }

    /// Cells of this record in sheet column order.
    pub fn cells(&self) -> [&str; 4] {
        [
            &self.timestamp,
            &self.carrier,
            &self.processed_code,
            &self.original_code,
        ]
    }
}

/// Formats a capture timestamp the way the sheet displays it.
pub fn capture_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// A parsed ingest payload.
#[derive(Debug, Clone)]
pub struct ScanPayload {
    pub records: Vec<RawRecord>,
}

impl ScanPayload {
    /// Parse an ingest payload from JSON bytes.
    /// Supports:
    /// 1. Array: `[record, record, ...]`
    /// 2. Single object: `{ "expressType": "...", ... }` (one-element batch)
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::malformed(format!("invalid JSON: {}", e)))?;

        match value {
            Value::Array(_) => {
                let records: Vec<RawRecord> = serde_json::from_value(value)
                    .map_err(|e| Error::malformed(format!("invalid record array: {}", e)))?;
                Ok(Self { records })
            }

            Value::Object(_) => {
                let record: RawRecord = serde_json::from_value(value)
                    .map_err(|e| Error::malformed(format!("invalid record object: {}", e)))?;
                Ok(Self {
                    records: vec![record],
                })
            }

            _ => Err(Error::malformed(
                "request body must be a record object or an array of records",
            )),
        }
    }
}

/// A batch after validation, ready to append.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    /// Valid records in input order, timestamped.
    pub rows: Vec<LogRecord>,
    /// How many raw records the payload contained, skipped ones included.
    pub total_received: usize,
}

impl PreparedBatch {
    pub fn skipped(&self) -> usize {
        self.total_received - self.rows.len()
    }
}

/// Validates a batch in input order, stamping each valid record with the
/// same server-side capture time. Invalid records are silently dropped.
pub fn prepare_batch(records: Vec<RawRecord>, now: DateTime<Local>) -> PreparedBatch {
    let total_received = records.len();
    let timestamp = capture_timestamp(now);

    let rows = records
        .into_iter()
        .filter_map(|raw| LogRecord::from_raw(raw, timestamp.clone()))
        .collect();

    PreparedBatch {
        rows,
        total_received,
    }
}
