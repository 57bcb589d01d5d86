//! Entity handlers - pattern analysis, recommendation, generation, cycle

use axum::{
    extract::{Path, Query, State},
    Json,
};
use intel_response_core::constants::DEFAULT_BEST_STRATEGY_LIMIT;
use intel_response_core::logic::patterns::PatternAnalysis;
use intel_response_core::logic::signal::{NarrativeRecord, Signal};
use intel_response_core::logic::strategy::{ResponseStrategy, StrategyRecommendation};
use intel_response_core::{CycleOptions, CycleReport};
use serde::Deserialize;
use validator::Validate;

use crate::{AppError, AppResult, AppState};

/// A signal window for one entity
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignalWindow {
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub signals: Vec<Signal>,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub narratives: Vec<NarrativeRecord>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CycleRequest {
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub signals: Vec<Signal>,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub narratives: Vec<NarrativeRecord>,
    #[serde(default)]
    pub execute_plan: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BestQuery {
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

fn check_entity(entity: &str) -> AppResult<()> {
    if entity.trim().is_empty() {
        return Err(AppError::ValidationError("entity name must not be empty".to_string()));
    }
    Ok(())
}

/// Detect patterns over the window
pub async fn patterns(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<SignalWindow>,
) -> AppResult<Json<PatternAnalysis>> {
    check_entity(&entity)?;
    req.validate()?;

    Ok(Json(state.engine.detector().analyze(&req.signals, &req.narratives)))
}

/// Detect patterns, then recommend a strategy type
pub async fn recommendation(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<SignalWindow>,
) -> AppResult<Json<StrategyRecommendation>> {
    check_entity(&entity)?;
    req.validate()?;

    let patterns = state.engine.detector().detect(&req.signals, &req.narratives);
    let recommendation = state.engine.recommend(&entity, &patterns).await?;
    Ok(Json(recommendation))
}

/// Detect patterns, then generate and persist strategies
pub async fn generate(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<SignalWindow>,
) -> AppResult<Json<Vec<ResponseStrategy>>> {
    check_entity(&entity)?;
    req.validate()?;

    let patterns = state.engine.detector().detect(&req.signals, &req.narratives);
    let strategies = state.engine.generator().generate(&entity, &patterns).await?;
    Ok(Json(strategies))
}

/// Pending strategies ranked by predicted success
pub async fn best(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(query): Query<BestQuery>,
) -> AppResult<Json<Vec<ResponseStrategy>>> {
    check_entity(&entity)?;
    query.validate()?;

    let limit = query.limit.unwrap_or(DEFAULT_BEST_STRATEGY_LIMIT);
    let ranked = state.engine.predictor().best_strategies(&entity, limit).await?;
    Ok(Json(ranked))
}

/// Full validate -> plan cycle
pub async fn cycle(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(req): Json<CycleRequest>,
) -> AppResult<Json<CycleReport>> {
    check_entity(&entity)?;
    req.validate()?;

    tracing::info!(entity = %entity, signals = req.signals.len(), "cycle requested");
    let report = state
        .engine
        .run_cycle(
            &entity,
            &req.signals,
            &req.narratives,
            CycleOptions {
                execute_plan: req.execute_plan,
            },
        )
        .await?;
    Ok(Json(report))
}
