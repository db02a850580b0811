//! Per-carrier statistics endpoint.

use axum::{extract::State, http::StatusCode, response::Response};
use std::collections::BTreeMap;

use scanlog_telemetry::metrics;

use crate::response::{ResponseFormat, StatsResponse};
use crate::state::AppState;

/// GET /stats - total row count plus per-carrier tallies.
pub async fn stats_handler(State(state): State<AppState>, format: ResponseFormat) -> Response {
    let rows = match state.sheet.read_all().await {
        Ok(rows) => rows,
        Err(err) => {
            metrics().store_errors.inc();
            return format.error(&err);
        }
    };

    let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
    for row in &rows {
        *by_type.entry(row.carrier.clone()).or_default() += 1;
    }

    format.render(
        StatusCode::OK,
        &StatsResponse {
            total: rows.len(),
            by_type,
        },
    )
}
