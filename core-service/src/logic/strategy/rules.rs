//! Strategy Rules & Tables
//!
//! Lookup tables and coefficients for the recommender, predictor and
//! optimizer. No decision logic here - only constants and config.

use serde::{Deserialize, Serialize};

use super::types::{StrategyPriority, StrategyType};
use crate::constants::LEARNED_PATTERN_LOOKBACK;
use crate::logic::patterns::{PatternImpact, PatternKind};

// ============================================================================
// RECOMMENDER
// ============================================================================

/// Dimensions of the recommender feature vector
pub const FEATURE_COUNT: usize = 15;

/// Cosine similarity a learned pattern must exceed to be reused
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Applied to a reused pattern's confidence
pub const MATCH_CONFIDENCE_PENALTY: f64 = 0.8;

/// Success rate assumed for a strategy type without samples
pub const NEUTRAL_SUCCESS_RATE: f64 = 0.5;

/// Platforms at which diversity saturates
pub const PLATFORM_DIVERSITY_SCALE: f64 = 10.0;

/// Rule-table expected outcome = confidence x this
pub const RULE_OUTCOME_FACTOR: f64 = 0.8;

pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Per-pattern weight in the entity risk score
pub fn risk_weight(kind: PatternKind) -> f64 {
    match kind {
        PatternKind::CoordinatedAttack => 0.9,
        PatternKind::ViralRisk => 0.8,
        PatternKind::InfluencerInvolvement => 0.7,
        PatternKind::SentimentShift => 0.6,
        PatternKind::PlatformMigration => 0.5,
    }
}

pub fn impact_factor(impact: PatternImpact) -> f64 {
    match impact {
        PatternImpact::High => 1.0,
        PatternImpact::Medium => 0.6,
        PatternImpact::Low => 0.3,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderPolicy {
    pub similarity_threshold: f64,
    pub match_confidence_penalty: f64,
    /// Newest learned patterns scanned per entity
    pub lookback: usize,
}

impl Default for RecommenderPolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            match_confidence_penalty: MATCH_CONFIDENCE_PENALTY,
            lookback: LEARNED_PATTERN_LOOKBACK,
        }
    }
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Success probability without same-type history
pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.7;
pub const SUCCESS_PROBABILITY_CAP: f64 = 0.95;

/// Actions above which the complexity penalty applies
pub const COMPLEX_ACTION_COUNT: usize = 5;
pub const COMPLEXITY_PENALTY: f64 = 0.9;

/// Samples at which history confidence saturates
pub const FULL_CONFIDENCE_SAMPLES: f64 = 10.0;

pub const OUTCOME_SUCCESS_MIN: f64 = 0.75;
pub const OUTCOME_PARTIAL_MIN: f64 = 0.50;

/// Hours to complete when no completed history exists
pub fn default_hours(strategy_type: StrategyType) -> f64 {
    match strategy_type {
        StrategyType::Defensive => 4.0,
        StrategyType::Proactive => 8.0,
        StrategyType::CounterNarrative => 6.0,
        StrategyType::Legal => 24.0,
        StrategyType::Engagement => 12.0,
    }
}

/// Added to the resource requirement
pub fn type_complexity(strategy_type: StrategyType) -> f64 {
    match strategy_type {
        StrategyType::Defensive => 0.3,
        StrategyType::Proactive => 0.7,
        StrategyType::CounterNarrative => 0.6,
        StrategyType::Legal => 0.9,
        StrategyType::Engagement => 0.5,
    }
}

/// Added to the base risk
pub fn type_risk(strategy_type: StrategyType) -> f64 {
    match strategy_type {
        StrategyType::Legal => 0.4,
        StrategyType::CounterNarrative => 0.3,
        _ => 0.0,
    }
}

pub fn priority_bonus(priority: StrategyPriority) -> f64 {
    match priority {
        StrategyPriority::Critical => 1.1,
        StrategyPriority::High => 1.05,
        _ => 1.0,
    }
}

// ============================================================================
// OPTIMIZER
// ============================================================================

pub const OPTIMIZER_BASE_CONFIDENCE: f64 = 0.7;
pub const OPTIMIZER_CONFIDENCE_CAP: f64 = 0.95;

/// Prior samples needed before a medium priority is elevated
pub const ELEVATE_PRIORITY_SAMPLES: usize = 5;

pub const TIMELINE_COMPRESSION: &[(&str, &str)] = &[
    ("6 hours", "4 hours"),
    ("12 hours", "8 hours"),
    ("24 hours", "18 hours"),
    ("48 hours", "36 hours"),
];

pub const ROLE_REMAP: &[(&str, &str)] = &[
    ("Content Team", "AI-Assisted Content Team"),
    ("Social Media Manager", "Automated Social Response"),
    ("Analytics Team", "Real-time Analytics Engine"),
];

pub const KPI_ENRICHMENT: &[(&str, &str)] = &[
    ("Sentiment score improvement", "Real-time sentiment tracking with 15-min intervals"),
    ("Engagement rate increase", "Multi-platform engagement optimization"),
    ("Content reach and engagement", "AI-optimized content distribution"),
];

pub const TIMEFRAME_COMPRESSION: &[(&str, &str)] = &[
    ("48-72 hours", "24-48 hours"),
    ("24-48 hours", "12-24 hours"),
    ("2-6 hours", "1-4 hours"),
];

/// Appended to every optimized strategy
pub const OPTIMIZER_RESOURCES: &[&str] = &["AI Assistant", "Automation Tools"];

/// Table lookup, identity when absent
pub fn remap(table: &[(&str, &str)], value: &str) -> String {
    table
        .iter()
        .find(|(from, _)| *from == value)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| value.to_string())
}
