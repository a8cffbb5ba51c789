use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sip_estimator::pricing::toolcall::{self, ToolCallError};
use sip_estimator::pricing::{
    CalculationError, CostBreakdown, CostCalculator, EstimateRequest, WorkEntry,
};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct EstimateResponse {
    /// Calibration date of the tables that produced this quote.
    pub(crate) effective_from: NaiveDate,
    #[serde(flatten)]
    pub(crate) breakdown: CostBreakdown,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse {
    pub(crate) effective_from: NaiveDate,
    pub(crate) roof_types: Vec<String>,
    pub(crate) house_shapes: Vec<&'static str>,
    pub(crate) partitions: Vec<String>,
    pub(crate) default_partition: String,
    pub(crate) ceilings: Vec<String>,
    pub(crate) default_ceiling: String,
    pub(crate) additional_works: Vec<WorkEntry>,
    pub(crate) delivery_cities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallRequest {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) arguments: serde_json::Value,
}

pub(crate) fn with_calculator_routes(calculator: Arc<CostCalculator>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/calculator/estimate", post(estimate_endpoint))
        .route("/api/v1/calculator/catalog", get(catalog_endpoint))
        .route("/api/v1/assistant/tool-call", post(tool_call_endpoint))
        .with_state(calculator)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn estimate_endpoint(
    State(calculator): State<Arc<CostCalculator>>,
    Json(request): Json<EstimateRequest>,
) -> Response {
    match calculator.calculate(request) {
        Ok(breakdown) => {
            let response = EstimateResponse {
                effective_from: calculator.tables().effective_from,
                breakdown,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => calculation_error_response(&error),
    }
}

pub(crate) async fn catalog_endpoint(
    State(calculator): State<Arc<CostCalculator>>,
) -> Json<CatalogResponse> {
    let tables = calculator.tables();
    Json(CatalogResponse {
        effective_from: tables.effective_from,
        roof_types: tables
            .roof_types()
            .into_iter()
            .map(str::to_string)
            .collect(),
        house_shapes: vec!["simple", "complex"],
        partitions: tables.partitions.clone(),
        default_partition: tables.default_partition.clone(),
        ceilings: tables.ceilings.clone(),
        default_ceiling: tables.default_ceiling.clone(),
        additional_works: tables.additional_works.clone(),
        delivery_cities: tables
            .delivery_fees
            .iter()
            .map(|entry| entry.city.clone())
            .collect(),
    })
}

/// Tool-call boundary for the conversational adapter: raw tool name and
/// arguments in, formatted result payload out.
pub(crate) async fn tool_call_endpoint(
    State(calculator): State<Arc<CostCalculator>>,
    Json(request): Json<ToolCallRequest>,
) -> Response {
    match toolcall::dispatch(&calculator, &request.name, &request.arguments) {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(ToolCallError::Calculation(error)) => calculation_error_response(&error),
        Err(error @ ToolCallError::UnknownTool(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error @ ToolCallError::InvalidArguments(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

/// Every validation failure is terminal for the request. `reprompt` tells
/// the conversational collaborator to ask again for the offending value
/// instead of reporting an invalid parameter combination.
fn calculation_error_response(error: &CalculationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "code": error.code(),
        "reprompt": error.should_reprompt(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
