//! Signal handlers - validation, classification, audit stats

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use intel_response_core::logic::threat::ThreatAssessment;
use intel_response_core::logic::validation::{ValidationResult, ValidationStats};
use serde::Deserialize;
use validator::Validate;

use crate::{AppResult, AppState};

const DEFAULT_BASE_CONFIDENCE: f64 = 0.5;
const API_OPERATION: &str = "api_validate";

#[derive(Debug, Deserialize, Validate)]
pub struct ValidateSignal {
    #[validate(length(min = 1, max = 100000))]
    pub content: String,
    #[validate(length(min = 1, max = 256))]
    pub entity_name: String,
    #[serde(default = "unknown_platform")]
    pub platform: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub base_confidence: Option<f64>,
    #[validate(length(min = 1, max = 64))]
    pub operation: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassifySignal {
    #[validate(length(min = 1, max = 100000))]
    pub content: String,
    #[validate(length(min = 1, max = 256))]
    pub entity_name: String,
    #[serde(default = "unknown_platform")]
    pub platform: String,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatsQuery {
    /// Window length, defaults to 24 hours
    #[validate(range(min = 1, max = 8760))]
    pub hours: Option<i64>,
}

fn unknown_platform() -> String {
    "unknown".to_string()
}

/// Validate one signal (audited)
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateSignal>,
) -> AppResult<Json<ValidationResult>> {
    req.validate()?;

    let result = state
        .engine
        .validator()
        .validate(
            &req.content,
            &req.entity_name,
            &req.platform,
            req.base_confidence.unwrap_or(DEFAULT_BASE_CONFIDENCE),
            req.operation.as_deref().unwrap_or(API_OPERATION),
        )
        .await;
    Ok(Json(result))
}

/// Validate and classify one signal
pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifySignal>,
) -> AppResult<Json<ThreatAssessment>> {
    req.validate()?;

    let assessment = state
        .engine
        .classifier()
        .classify(&req.content, &req.entity_name, &req.platform, req.context.as_deref())
        .await;
    Ok(Json(assessment))
}

/// Audit counters over the trailing window
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ValidationStats>> {
    query.validate()?;

    let since = Utc::now() - Duration::hours(query.hours.unwrap_or(24));
    Ok(Json(state.engine.validator().stats_since(since).await))
}
