//! Request handlers.

use super::AppState;
use crate::error::{ExportError, ScanError, SCAN_FAULT_HINT};
use crate::output::{export as encode, ExportFormat, ExportOptions};
use crate::scanner::{run_scan, HostResult};
use crate::types::{validate_cidr, SubnetError};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

const DASHBOARD: &str = include_str!("dashboard.html");

/// Failures reported to API clients.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is unusable (bad subnet, unknown format).
    BadRequest(String),
    /// The scan or the encoder failed.
    Internal { error: &'static str, detail: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            Self::Internal { error, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error, "detail": detail })),
            )
                .into_response(),
        }
    }
}

impl From<SubnetError> for ApiError {
    fn from(err: SubnetError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            e @ ScanError::SubnetTooLarge { .. } => Self::BadRequest(e.to_string()),
            e => {
                error!(error = %e, "scan failed");
                Self::Internal {
                    error: "scan failed",
                    detail: format!("{}; {}", e, SCAN_FAULT_HINT),
                }
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        error!(error = %err, "export failed");
        Self::Internal {
            error: "export failed",
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub subnet: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub subnet: String,
    pub results: Vec<HostResult>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub results: Vec<HostResult>,
    #[serde(default)]
    pub show_services: bool,
}

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// `GET /scan?subnet=<CIDR>`
pub async fn scan(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<Json<ScanResponse>, ApiError> {
    let subnet = query
        .subnet
        .unwrap_or_else(|| state.default_subnet.to_string());
    let parsed = validate_cidr(&subnet).inspect_err(|e| warn!(%subnet, error = %e, "rejected subnet"))?;

    let report = run_scan(
        &state.discovery,
        state.prober.as_ref(),
        &parsed,
        &state.options,
        None,
    )
    .await?;

    Ok(Json(ScanResponse {
        subnet,
        results: report.results,
    }))
}

/// `POST /export/:format`
pub async fn export(
    Path(format): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse().map_err(ApiError::BadRequest)?;
    let options = ExportOptions {
        show_services: request.show_services,
    };
    let body = encode(&request.results, format, &options)?;

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
