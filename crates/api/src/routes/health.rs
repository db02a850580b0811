//! Root GET / OPTIONS handlers and health probes.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::warn;

use scanlog_telemetry::{health, metrics};

use crate::extractors::query_param;
use crate::response::{HealthResponse, ResponseFormat};
use crate::routes::ingest;
use crate::state::AppState;

/// GET / - health check, or ingest when a `data` parameter is present.
///
/// The `data` detour exists for clients stuck on script-tag (JSONP)
/// transport, which can only issue GETs.
pub async fn root_handler(
    State(state): State<AppState>,
    format: ResponseFormat,
    uri: Uri,
) -> Response {
    if let Some(data) = query_param(&uri, "data") {
        return ingest::process_batch(&state, &format, data.as_bytes()).await;
    }

    match state.sheet.data_row_count().await {
        Ok(total) => {
            health().sheet.set_healthy();
            format.render(
                StatusCode::OK,
                &HealthResponse::healthy(total, state.sheet.name()),
            )
        }
        Err(err) => {
            metrics().store_errors.inc();
            health().sheet.set_unhealthy(err.to_string());
            warn!(error = %err, "Health check failed to read sheet");
            format.error(&err)
        }
    }
}

/// OPTIONS / - CORS preflight: empty body, advertises allowed methods.
pub async fn preflight_handler() -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
    response
}

/// GET /health/ready - readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
