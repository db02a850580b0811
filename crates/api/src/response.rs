//! Response envelopes and encoding.
//!
//! Every payload can be rendered two ways: strict JSON, or JSONP
//! (`callback(<json>);` with a script content type) for clients that fall
//! back to script-tag transport to sidestep cross-origin restrictions.
//! JSONP responses are always HTTP 200, because a script tag cannot read
//! the body of a non-200 response.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

use scanlog_core::Error;

/// Fallback callback name when the supplied one is unusable.
const DEFAULT_CALLBACK: &str = "callback";

/// Success response for ingestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub total_received: usize,
    pub processed: usize,
}

impl IngestResponse {
    pub fn success(processed: usize, total_received: usize) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("成功处理 {} 条记录", processed),
            timestamp: Utc::now().to_rfc3339(),
            total_received,
            processed,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub total_records: usize,
    pub timestamp: String,
    pub sheet_name: String,
}

impl HealthResponse {
    pub fn healthy(total_records: usize, sheet_name: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message: "服务正常运行".to_string(),
            total_records,
            timestamp: Utc::now().to_rfc3339(),
            sheet_name: sheet_name.into(),
        }
    }
}

/// Per-carrier tallies for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: usize,
    pub by_type: BTreeMap<String, u64>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Output encoding selected by the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Jsonp(String),
}

impl ResponseFormat {
    /// Selects the encoding from an optional `callback` query parameter.
    /// Callback names that are not plain JS identifiers are replaced with
    /// the default; the payload must never echo attacker-controlled script.
    pub fn from_callback(callback: Option<&str>) -> Self {
        match callback {
            Some(name) if is_valid_callback(name) => Self::Jsonp(name.to_string()),
            Some(_) => Self::Jsonp(DEFAULT_CALLBACK.to_string()),
            None => Self::Json,
        }
    }

    /// Renders a payload in this encoding.
    pub fn render<T: Serialize>(&self, status: StatusCode, body: &T) -> Response {
        match self {
            Self::Json => (status, Json(body)).into_response(),
            Self::Jsonp(callback) => {
                let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
                (
                    StatusCode::OK,
                    [(
                        header::CONTENT_TYPE,
                        "application/javascript; charset=utf-8",
                    )],
                    format!("{}({});", callback, json),
                )
                    .into_response()
            }
        }
    }

    /// Renders an error in this encoding with its mapped HTTP status.
    pub fn error(&self, err: &Error) -> Response {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.render(status, &ErrorBody::new(err.to_string()))
    }
}

/// JS identifier with optional dots, e.g. `jQuery123.cb`.
fn is_valid_callback(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
