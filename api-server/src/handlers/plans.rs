//! Coordination plan handlers

use axum::{
    extract::{Path, State},
    Json,
};
use intel_response_core::logic::coordination::{
    CoordinationMetrics, CoordinationPlan, CoordinationResult, PlanStatusReport,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{AppResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlan {
    #[validate(length(min = 1, max = 256))]
    pub entity_name: String,
    #[validate(length(min = 1, max = 100))]
    pub strategy_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub plan: CoordinationPlan,
    pub status: PlanStatusReport,
}

/// Create a plan over stored strategies
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePlan>,
) -> AppResult<Json<CoordinationPlan>> {
    req.validate()?;

    let plan = state
        .engine
        .coordinator()
        .create_plan_for_ids(&req.entity_name, &req.strategy_ids)
        .await?;
    Ok(Json(plan))
}

/// Get plan with its status summary
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PlanView>> {
    let coordinator = state.engine.coordinator();
    let plan = coordinator.get_plan(&id).await?;
    let status = coordinator.plan_status(&id).await?;
    Ok(Json(PlanView { plan, status }))
}

pub async fn metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CoordinationMetrics>> {
    Ok(Json(state.engine.coordinator().plan_metrics(&id).await?))
}

/// Execute a pending plan
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CoordinationResult>> {
    Ok(Json(state.engine.coordinator().execute_plan(&id).await?))
}
