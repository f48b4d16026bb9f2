use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use cost_core::{CalculationResults, FormData, SanitizeReport};
use serde::Serialize;
use std::sync::atomic::Ordering;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

type ApiError = (StatusCode, Json<serde_json::Value>);

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, HeaderValue::from_static("http://localhost:5173"))
}

pub fn make_router_with_cors(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/calculate", post(calculate_handler))
        .route("/api/v1/sanitize", post(sanitize_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "cost_daemon",
        "version": env!("CARGO_PKG_VERSION"),
        "constants": *app_state.constants,
        "requests_served": app_state.requests_served.load(Ordering::Relaxed),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub request_id: String,
    pub rejected_fields: Vec<String>,
    pub results: CalculationResults,
}

/// One request, one response. The computation is pure and bounded, so it
/// runs on the blocking pool only to keep the async workers free.
pub async fn calculate_handler(
    State(app_state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let constants = app_state.constants.clone();
    let (results, report) = tokio::task::spawn_blocking(move || {
        let (form, report) = cost_core::sanitize_with_report(&raw);
        (cost_core::calculate_form(&form, &constants), report)
    })
    .await
    .map_err(|err| {
        tracing::error!(%request_id, "calculation task failed: {err}");
        internal_error("calculation failed")
    })?;

    log_rejected(&request_id, &report);
    app_state.requests_served.fetch_add(1, Ordering::Relaxed);
    tracing::info!(
        %request_id,
        selling_price_per_kg = results.selling_price_per_kg,
        market_position = %results.competitor_analysis.market_position,
        "calculated"
    );

    Ok(Json(CalculateResponse {
        request_id,
        rejected_fields: report.rejected,
        results,
    }))
}

pub async fn sanitize_handler(Json(raw): Json<serde_json::Value>) -> Json<FormData> {
    Json(cost_core::sanitize(&raw))
}

fn log_rejected(request_id: &str, report: &SanitizeReport) {
    if !report.is_clean() {
        tracing::debug!(
            request_id,
            fields = ?report.rejected,
            "input fields replaced by defaults"
        );
    }
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
}
