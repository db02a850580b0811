//! Ingest endpoint handler.
//!
//! Accepts scan records in 2 formats:
//! 1. Array: `[record, record, ...]`
//! 2. Single object: `{ "expressType": "...", "processedCode": "...", ... }`
//!
//! The payload normally arrives as the raw POST body; as a CORS-bypass
//! fallback it may instead come in a `data` query or form parameter.
//! Records with a missing carrier or processed code are skipped without
//! failing the batch.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Uri},
    response::Response,
};
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};

use scanlog_core::{
    limits::{MAX_BATCH_RECORDS, MAX_BATCH_SIZE_BYTES},
    prepare_batch, Error, Result, ScanPayload,
};
use scanlog_telemetry::metrics;

use crate::extractors::query_param;
use crate::response::{IngestResponse, ResponseFormat};
use crate::state::AppState;

/// POST / - primary ingestion endpoint.
pub async fn ingest_handler(
    State(state): State<AppState>,
    format: ResponseFormat,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match resolve_payload(&uri, &headers, &body) {
        Ok(bytes) => bytes,
        Err(err) => {
            metrics().malformed_requests.inc();
            warn!(error = %err, "Rejected ingest request");
            return format.error(&err);
        }
    };

    process_batch(&state, &format, &payload).await
}

/// Picks the payload bytes out of the request: `data` parameter first
/// (query, then form body), raw body otherwise.
fn resolve_payload(uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Result<Vec<u8>> {
    if let Some(data) = query_param(uri, "data") {
        return Ok(data.into_bytes());
    }

    if body.is_empty() {
        return Err(Error::malformed("没有收到数据"));
    }

    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        return url::form_urlencoded::parse(body)
            .find(|(k, _)| k == "data")
            .map(|(_, v)| v.into_owned().into_bytes())
            .ok_or_else(|| Error::malformed("form body has no data field"));
    }

    Ok(body.to_vec())
}

/// Shared ingest path, also reached by `GET /?data=...`.
pub(crate) async fn process_batch(
    state: &AppState,
    format: &ResponseFormat,
    payload: &[u8],
) -> Response {
    let start = Instant::now();
    metrics().batches_received.inc();

    // Check payload size before parsing
    if payload.len() > MAX_BATCH_SIZE_BYTES {
        metrics().malformed_requests.inc();
        return format.error(&Error::malformed(format!(
            "payload size {}KB exceeds {}KB limit",
            payload.len() / 1024,
            MAX_BATCH_SIZE_BYTES / 1024
        )));
    }

    debug!(payload_size = payload.len(), "Received scan batch");

    let parsed = match ScanPayload::parse(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            metrics().malformed_requests.inc();
            warn!(error = %err, "Failed to parse scan payload");
            return format.error(&err);
        }
    };

    let total_received = parsed.records.len();
    metrics().records_received.inc_by(total_received as u64);

    if total_received > MAX_BATCH_RECORDS {
        metrics().malformed_requests.inc();
        return format.error(&Error::malformed(format!(
            "batch has {} records, exceeds {} limit",
            total_received, MAX_BATCH_RECORDS
        )));
    }

    // Server-side capture time; client timestamps are never trusted.
    let batch = prepare_batch(parsed.records, Local::now());

    if batch.skipped() > 0 {
        warn!(
            received = batch.total_received,
            skipped = batch.skipped(),
            "Some records lack carrier or processed code"
        );
        metrics().records_skipped.inc_by(batch.skipped() as u64);
    }

    let processed = batch.rows.len();
    if processed > 0 {
        if let Err(err) = state.sheet.append_rows(batch.rows).await {
            metrics().store_errors.inc();
            tracing::error!(error = %err, "Failed to append scan records");
            return format.error(&err);
        }
        metrics().records_appended.inc_by(processed as u64);
    }

    if let Ok(count) = state.sheet.data_row_count().await {
        metrics().sheet_rows.set(count as u64);
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().ingest_latency_ms.observe(latency_ms);

    info!(
        processed = processed,
        total_received = batch.total_received,
        latency_ms = latency_ms,
        "Batch processed"
    );

    format.render(
        axum::http::StatusCode::OK,
        &IngestResponse::success(processed, batch.total_received),
    )
}
