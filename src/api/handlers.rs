use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RawInputs, TaxReport, MAX_AGE, MIN_AGE},
    services::peers::DistanceMetric,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub regressor: &'static str,
    pub reference_population: usize,
    pub n_neighbors: usize,
    pub metric: DistanceMetric,
    pub loaded_at: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Describe the loaded models
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let advisor = state.advisor();
    let settings = advisor.peers().settings();

    Json(ModelInfoResponse {
        regressor: advisor.estimator().kind(),
        reference_population: advisor.peers().len(),
        n_neighbors: settings.n_neighbors,
        metric: settings.metric,
        loaded_at: state.loaded_at(),
    })
}

/// Estimate tax and recommend deductions and investments for one submission
pub async fn optimize(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RawInputs>, JsonRejection>,
) -> AppResult<Json<TaxReport>> {
    // Malformed bodies get the same 400 JSON error as range failures
    let Json(inputs) = body?;
    validate_inputs(&inputs)?;

    tracing::info!(
        request_id = %request_id,
        age = inputs.age,
        "Processing optimization request"
    );

    let report = state.advisor().optimize(&inputs)?;

    tracing::info!(
        request_id = %request_id,
        investment_tier = %report.investment_advice.tier,
        deduction_tier = %report.deduction_advice.tier,
        "Optimization completed"
    );

    Ok(Json(report))
}

/// Range checks done at the boundary so the core only sees valid profiles
pub fn validate_inputs(inputs: &RawInputs) -> AppResult<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&inputs.age) {
        return Err(AppError::InvalidInput(format!(
            "age must be between {} and {}",
            MIN_AGE, MAX_AGE
        )));
    }

    for (name, value) in inputs.monetary_fields() {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "{} must be a non-negative amount",
                name
            )));
        }
    }

    Ok(())
}
