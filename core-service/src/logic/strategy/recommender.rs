//! Strategy Recommender
//!
//! Nearest-neighbour reuse of learned outcomes, with a deterministic
//! rule table when nothing similar has been seen. Every recommendation
//! is written back as a new learned pattern.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::features::{extract_features, IDX_COORDINATED, IDX_HIGH_IMPACT, IDX_RISK};
use super::rules::*;
use super::similarity::PatternMatch;
use super::types::*;
use crate::logic::patterns::{DetectedPattern, PatternImpact};
use crate::storage::Persistence;

pub struct StrategyRecommender {
    policy: RecommenderPolicy,
    store: Arc<dyn Persistence>,
}

impl StrategyRecommender {
    pub fn new(policy: RecommenderPolicy, store: Arc<dyn Persistence>) -> Self {
        Self { policy, store }
    }

    pub async fn recommend(
        &self,
        entity_name: &str,
        patterns: &[DetectedPattern],
        history: &[HistoricalEvent],
    ) -> StrategyRecommendation {
        self.recommend_at(entity_name, patterns, history, Utc::now()).await
    }

    /// `recommend` with an explicit clock for the recency features
    pub async fn recommend_at(
        &self,
        entity_name: &str,
        patterns: &[DetectedPattern],
        history: &[HistoricalEvent],
        now: DateTime<Utc>,
    ) -> StrategyRecommendation {
        let features = extract_features(patterns, history, now);

        let matched = match self
            .store
            .learned_patterns()
            .find_best_match(entity_name, &features, self.policy.similarity_threshold, self.policy.lookback)
            .await
        {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(entity = entity_name, error = %e, "learned pattern lookup failed, using fallback");
                return fallback_recommendation();
            }
        };

        let recommendation = match matched {
            Some(m) => {
                tracing::debug!(
                    entity = entity_name,
                    pattern = %m.pattern.id,
                    similarity = m.similarity,
                    "reusing learned pattern"
                );
                from_match(&m, patterns, self.policy.match_confidence_penalty)
            }
            None => rule_based(&features, patterns),
        };

        let learned = LearnedPattern {
            id: format!("learned-{}", Uuid::new_v4()),
            entity_name: entity_name.to_string(),
            features,
            success_rate: recommendation.expected_outcome,
            optimal_strategy: recommendation.strategy_type,
            confidence: recommendation.confidence,
            created_at: now,
        };
        if let Err(e) = self.store.learned_patterns().insert(learned).await {
            tracing::error!(entity = entity_name, error = %e, "failed to persist learned pattern");
        }

        tracing::info!(
            entity = entity_name,
            strategy = recommendation.strategy_type.as_str(),
            confidence = recommendation.confidence,
            "strategy recommended"
        );
        recommendation
    }
}

// ============================================================================
// DECISION RULES
// ============================================================================

pub fn from_match(m: &PatternMatch, patterns: &[DetectedPattern], penalty: f64) -> StrategyRecommendation {
    StrategyRecommendation {
        strategy_type: m.pattern.optimal_strategy,
        confidence: (m.pattern.confidence * penalty).clamp(0.0, 1.0),
        reasoning: format!(
            "Based on similar historical patterns with {:.1}% success rate",
            m.pattern.success_rate * 100.0
        ),
        expected_outcome: m.pattern.success_rate,
        risk_factors: risk_factors(patterns),
    }
}

/// First matching rule wins
pub fn rule_based(features: &[f64], patterns: &[DetectedPattern]) -> StrategyRecommendation {
    let feature = |i: usize| features.get(i).copied().unwrap_or(0.0);
    let risk = feature(IDX_RISK);
    let high_impact = feature(IDX_HIGH_IMPACT) > 0.5;

    let (strategy_type, confidence, reasoning) = if feature(IDX_COORDINATED) > 0.0 {
        (
            StrategyType::CounterNarrative,
            0.8,
            "Coordinated attack detected - counter-narrative recommended",
        )
    } else if high_impact && risk > 0.7 {
        (
            StrategyType::Proactive,
            0.7,
            "High impact patterns with elevated risk - proactive approach recommended",
        )
    } else if risk < 0.3 {
        (
            StrategyType::Engagement,
            0.6,
            "Low risk environment - engagement strategy recommended",
        )
    } else {
        (StrategyType::Defensive, 0.6, "Rule-based recommendation")
    };

    StrategyRecommendation {
        strategy_type,
        confidence,
        reasoning: reasoning.to_string(),
        expected_outcome: confidence * RULE_OUTCOME_FACTOR,
        risk_factors: risk_factors(patterns),
    }
}

pub fn risk_factors(patterns: &[DetectedPattern]) -> Vec<String> {
    let mut factors = Vec::new();
    for p in patterns {
        let name = p.kind.as_str().replace('_', " ");
        if p.impact == PatternImpact::High {
            factors.push(format!("High impact {}", name));
        }
        if p.confidence > 0.8 {
            factors.push(format!("High confidence detection of {}", name));
        }
    }
    factors
}

pub fn fallback_recommendation() -> StrategyRecommendation {
    StrategyRecommendation {
        strategy_type: StrategyType::Defensive,
        confidence: FALLBACK_CONFIDENCE,
        reasoning: "Fallback recommendation due to pattern lookup failure".to_string(),
        expected_outcome: FALLBACK_CONFIDENCE,
        risk_factors: vec!["Analysis incomplete".to_string()],
    }
}
