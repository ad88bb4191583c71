//! API request handlers
//!
//! Every JSON endpoint answers with an [`ApiResponse`] envelope. Month data is
//! read through the shared cache; when the workbook cannot be loaded the
//! handlers report "no data available" instead of failing the request.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::server::AppState;
use crate::export::{artifact_name, ReportExporter};
use crate::report::{HoursDisplay, Report, ReportAggregator};
use crate::search::{search_names, EmptyQuery};
use crate::types::MonthData;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Month data from the cache, loaded on a blocking thread if still cold
async fn month_data(state: &Arc<AppState>) -> Result<Arc<MonthData>, String> {
    let state = Arc::clone(state);
    let loaded = tokio::task::spawn_blocking(move || state.cache.require()).await;
    match loaded {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => {
            warn!(error = %e, "request without month data");
            Err(format!("no data available: {}", e))
        }
        Err(e) => Err(format!("no data available: {}", e)),
    }
}

//==============================================================================
// Info endpoints
//==============================================================================

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: "GET".to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Strike Hours API".to_string(),
        version: state.version.clone(),
        description: "Proof-of-hours lookup over the strike spreadsheet".to_string(),
        endpoints: vec![
            endpoint("/health", "Health check"),
            endpoint("/version", "Server version"),
            endpoint("/api/v1/months", "Months found in the workbook"),
            endpoint("/api/v1/search?q=", "Employee names containing q"),
            endpoint(
                "/api/v1/report?name=&display=",
                "Per-month days and hours for one employee",
            ),
            endpoint(
                "/api/v1/report/xlsx?name=&display=",
                "Download the report as Horas_<name>.xlsx",
            ),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_loaded: bool,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        data_loaded: state.cache.is_loaded(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub source: String,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        source: state.config.source.display().to_string(),
    }))
}

//==============================================================================
// Data endpoints
//==============================================================================

#[derive(Debug, Serialize)]
pub struct MonthInfo {
    pub label: String,
    pub sheet: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct MonthsResponse {
    pub months: Vec<MonthInfo>,
    pub total_records: usize,
}

/// GET /api/v1/months - Loaded months in workbook order
pub async fn months(State(state): State<Arc<AppState>>) -> Json<ApiResponse<MonthsResponse>> {
    match month_data(&state).await {
        Ok(data) => Json(ApiResponse::ok(MonthsResponse {
            months: data
                .iter()
                .map(|t| MonthInfo {
                    label: t.month_label.clone(),
                    sheet: t.sheet_name.clone(),
                    rows: t.len(),
                })
                .collect(),
            total_records: data.total_records(),
        })),
        Err(message) => Json(ApiResponse::err(message)),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Overrides the configured empty-query policy
    pub empty: Option<EmptyQuery>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub names: Vec<String>,
}

/// GET /api/v1/search?q= - Names containing the query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<ApiResponse<SearchResponse>> {
    let data = match month_data(&state).await {
        Ok(data) => data,
        Err(message) => return Json(ApiResponse::err(message)),
    };
    let policy = params.empty.unwrap_or(state.config.empty_query);
    let names = search_names(&data, &params.q, policy);
    Json(ApiResponse::ok(SearchResponse {
        query: params.q,
        names,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub name: String,
    pub display: Option<HoursDisplay>,
}

fn build(state: &AppState, data: &MonthData, params: &ReportParams) -> Report {
    let display = params.display.unwrap_or(state.config.display);
    ReportAggregator::from_config(&state.config)
        .with_display(display)
        .aggregate(data, &params.name)
}

/// GET /api/v1/report?name=&display= - One employee's report
pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Json<ApiResponse<Report>> {
    match month_data(&state).await {
        Ok(data) => Json(ApiResponse::ok(build(&state, &data, &params))),
        Err(message) => Json(ApiResponse::err(message)),
    }
}

/// GET /api/v1/report/xlsx?name=&display= - Report as a workbook download
pub async fn report_xlsx(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Response {
    let data = match month_data(&state).await {
        Ok(data) => data,
        Err(message) => {
            return failure(StatusCode::SERVICE_UNAVAILABLE, message);
        }
    };

    let report = build(&state, &data, &params);
    if report.is_empty() {
        return failure(
            StatusCode::NOT_FOUND,
            format!("no records for '{}'", params.name.trim()),
        );
    }

    match ReportExporter::new(&report).to_xlsx_bytes() {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME)),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&artifact_name(&report.employee)),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

/// `attachment` header with an ASCII fallback plus the UTF-8 file name
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut value = format!("attachment; filename=\"{}\"", fallback);
    if fallback != filename {
        value.push_str("; filename*=UTF-8''");
        for byte in filename.bytes() {
            if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
                value.push(byte as char);
            } else {
                value.push_str(&format!("%{:02X}", byte));
            }
        }
    }

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let response: ApiResponse<String> = ApiResponse::ok("data".to_string());
        assert!(response.success);
        assert_eq!(response.data, Some("data".to_string()));
        assert!(response.error.is_none());
        // UUID v4 text form
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err() {
        let response: ApiResponse<String> = ApiResponse::err("no data available");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("no data available"));
    }

    #[test]
    fn test_api_response_err_skips_data_field() {
        let response: ApiResponse<String> = ApiResponse::err("boom");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a: ApiResponse<()> = ApiResponse::ok(());
        let b: ApiResponse<()> = ApiResponse::ok(());
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_content_disposition_ascii() {
        let value = content_disposition("Horas_ANA SOUZA.xlsx");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Horas_ANA SOUZA.xlsx\""
        );
    }

    #[test]
    fn test_content_disposition_utf8() {
        let value = content_disposition("Horas_JOSÉ.xlsx");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Horas_JOS_.xlsx\"; filename*=UTF-8''Horas_JOS%C3%89.xlsx"
        );
    }
}
