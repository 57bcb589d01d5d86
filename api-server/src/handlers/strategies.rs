//! Strategy handlers

use axum::{
    extract::{Path, State},
    Json,
};
use intel_response_core::logic::response::StrategyExecutionResult;
use intel_response_core::logic::strategy::{OptimizationResult, ResponseStrategy, StrategyPrediction};

use crate::{AppResult, AppState};

/// Get single strategy
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ResponseStrategy>> {
    Ok(Json(state.engine.strategy(&id).await?))
}

/// Predict (and persist) the outcome of a strategy
pub async fn prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StrategyPrediction>> {
    Ok(Json(state.engine.predictor().predict_by_id(&id).await?))
}

/// Derive an optimized copy
pub async fn optimize(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<OptimizationResult>> {
    Ok(Json(state.engine.optimizer().optimize(&id).await?))
}

/// Execute a pending strategy
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StrategyExecutionResult>> {
    Ok(Json(state.engine.executor().execute(&id).await?))
}
