//! Outcome Predictor
//!
//! Scores a strategy's success probability, duration, resource load and
//! risk from same-type history and fixed coefficients. Predictions are
//! advisory; they are persisted for later calibration.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::rules::*;
use super::types::*;
use crate::constants::{BEST_STRATEGY_CANDIDATES, PREDICTION_HISTORY_LIMIT};
use crate::error::{EngineError, EngineResult};
use crate::storage::{Persistence, SortOrder, StrategyFilter};

pub struct OutcomePredictor {
    store: Arc<dyn Persistence>,
}

impl OutcomePredictor {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self { store }
    }

    /// Predict against the entity's executed same-type history
    pub async fn predict(&self, strategy: &ResponseStrategy, entity_name: &str) -> EngineResult<StrategyPrediction> {
        let filter = StrategyFilter::for_entity(entity_name)
            .with_type(strategy.strategy_type)
            .executed()
            .excluding(&strategy.id);
        let history = self
            .store
            .strategies()
            .query(&filter, SortOrder::NewestFirst, PREDICTION_HISTORY_LIMIT)
            .await?;

        let prediction = predict(strategy, entity_name, &history, Utc::now());

        if let Err(e) = self.store.predictions().insert(prediction.clone()).await {
            tracing::error!(strategy = %strategy.id, error = %e, "failed to persist prediction");
        }

        tracing::debug!(
            strategy = %strategy.id,
            outcome = prediction.predicted_outcome.as_str(),
            success = prediction.metrics.success_probability,
            "strategy outcome predicted"
        );
        Ok(prediction)
    }

    pub async fn predict_by_id(&self, strategy_id: &str) -> EngineResult<StrategyPrediction> {
        let strategy = self
            .store
            .strategies()
            .get(strategy_id)
            .await?
            .ok_or_else(|| EngineError::strategy_not_found(strategy_id))?;
        self.predict(&strategy, &strategy.entity_name).await
    }

    /// Newest pending strategies ranked by predicted success
    pub async fn best_strategies(&self, entity_name: &str, limit: usize) -> EngineResult<Vec<ResponseStrategy>> {
        let filter = StrategyFilter::for_entity(entity_name).with_status(StrategyStatus::Pending);
        let candidates = self
            .store
            .strategies()
            .query(&filter, SortOrder::NewestFirst, BEST_STRATEGY_CANDIDATES)
            .await?;

        let mut scored = Vec::with_capacity(candidates.len());
        for strategy in candidates {
            let prediction = self.predict(&strategy, entity_name).await?;
            scored.push((prediction.metrics.success_probability, strategy));
        }

        // Stable: equal scores keep newest-first order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored.into_iter().take(limit).map(|(_, s)| s).collect())
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Pure prediction over pre-loaded same-type history
pub fn predict(
    strategy: &ResponseStrategy,
    entity_name: &str,
    history: &[ResponseStrategy],
    now: DateTime<Utc>,
) -> StrategyPrediction {
    let success_probability = success_probability(strategy, history);
    let metrics = PredictionMetrics {
        success_probability,
        time_to_complete: time_to_complete(strategy.strategy_type, history),
        resource_requirement: resource_requirement(strategy),
        risk_level: risk_level(strategy),
        confidence_score: confidence_score(history.len(), success_probability),
    };

    StrategyPrediction {
        strategy_id: strategy.id.clone(),
        entity_name: entity_name.to_string(),
        predicted_outcome: predicted_outcome(&metrics),
        recommendations: recommendations(&metrics),
        alternatives: alternatives(&metrics),
        metrics,
        predicted_at: now,
    }
}

pub fn success_probability(strategy: &ResponseStrategy, history: &[ResponseStrategy]) -> f64 {
    if history.is_empty() {
        return DEFAULT_SUCCESS_PROBABILITY;
    }

    let successes = history
        .iter()
        .filter(|s| s.execution.as_ref().map_or(false, |e| e.is_success()))
        .count();
    let base = successes as f64 / history.len() as f64;

    let complexity = if strategy.actions.len() > COMPLEX_ACTION_COUNT {
        COMPLEXITY_PENALTY
    } else {
        1.0
    };

    (base * complexity * priority_bonus(strategy.priority)).min(SUCCESS_PROBABILITY_CAP)
}

/// Mean hours of completed history, else the type default
pub fn time_to_complete(strategy_type: StrategyType, history: &[ResponseStrategy]) -> f64 {
    let durations: Vec<f64> = history.iter().filter_map(|s| s.completion_hours()).collect();
    if durations.is_empty() {
        return default_hours(strategy_type);
    }
    (durations.iter().sum::<f64>() / durations.len() as f64).round()
}

pub fn resource_requirement(strategy: &ResponseStrategy) -> f64 {
    (0.5 + 0.1 * strategy.actions.len() as f64
        + 0.15 * strategy.resources.len() as f64
        + type_complexity(strategy.strategy_type))
    .min(1.0)
}

pub fn risk_level(strategy: &ResponseStrategy) -> f64 {
    let priority_risk = if strategy.priority == StrategyPriority::Critical { 0.2 } else { 0.0 };
    (0.3 + type_risk(strategy.strategy_type) + priority_risk + 0.05 * strategy.actions.len() as f64).min(1.0)
}

pub fn confidence_score(samples: usize, success_probability: f64) -> f64 {
    0.5 * (samples as f64 / FULL_CONFIDENCE_SAMPLES).min(1.0) + 0.3 * success_probability + 0.2
}

pub fn predicted_outcome(m: &PredictionMetrics) -> PredictedOutcome {
    let score = 0.4 * m.success_probability
        + 0.3 * (1.0 - m.risk_level)
        + 0.2 * (1.0 - m.resource_requirement)
        + 0.1 * m.confidence_score;

    if score >= OUTCOME_SUCCESS_MIN {
        PredictedOutcome::Success
    } else if score >= OUTCOME_PARTIAL_MIN {
        PredictedOutcome::Partial
    } else {
        PredictedOutcome::Failure
    }
}

pub fn recommendations(m: &PredictionMetrics) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();

    if m.success_probability < 0.6 {
        out.push("Consider strategy optimization before execution");
        out.push("Review historical similar cases for improvements");
    }
    if m.resource_requirement > 0.8 {
        out.push("Ensure adequate resource allocation");
        out.push("Consider breaking into smaller phases");
    }
    if m.risk_level > 0.7 {
        out.push("Implement additional risk mitigation measures");
        out.push("Consider legal review before execution");
    }
    if m.time_to_complete > 12.0 {
        out.push("Set intermediate milestones for tracking");
        out.push("Consider parallel execution of actions");
    }
    if out.is_empty() {
        out.push("Strategy shows good success indicators");
        out.push("Proceed with standard execution protocols");
    }

    out.into_iter().map(String::from).collect()
}

pub fn alternatives(m: &PredictionMetrics) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();

    if m.success_probability < 0.5 {
        out.push("Defensive monitoring approach");
        out.push("Gradual engagement strategy");
    }
    if m.risk_level > 0.8 {
        out.push("Low-risk monitoring only");
        out.push("Third-party mediated approach");
    }
    if m.resource_requirement > 0.9 {
        out.push("Simplified action plan");
        out.push("Automated response deployment");
    }

    out.into_iter().map(String::from).collect()
}
