//! Engine Configuration
//!
//! Every threshold the engine applies is a tunable policy parameter.
//! Defaults reproduce the documented behaviour; presets and JSON files
//! adjust them at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EngineError, EngineResult};
use crate::logic::coordination::CoordinationPolicy;
use crate::logic::patterns::PatternThresholds;
use crate::logic::response::ExecutionPolicy;
use crate::logic::strategy::RecommenderPolicy;
use crate::logic::validation::ValidationPolicy;

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Engine configuration (can be loaded from a config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationPolicy,
    pub patterns: PatternThresholds,
    pub recommender: RecommenderPolicy,
    pub execution: ExecutionPolicy,
    pub coordination: CoordinationPolicy,
}

impl EngineConfig {
    /// Defaults with environment overrides for the execution knobs
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.execution.action_timeout_ms = constants::get_action_timeout_ms();
        config.execution.concurrent_actions = constants::is_concurrent_dispatch_enabled();
        config
    }

    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        config.check()?;
        Ok(config)
    }

    /// High sensitivity - lower cutoffs, patterns fire earlier
    pub fn high_sensitivity() -> Self {
        Self {
            validation: ValidationPolicy {
                accept_min: 0.5,
                review_min: 0.25,
                quarantine_min: 0.1,
                ..Default::default()
            },
            patterns: PatternThresholds {
                burst_min_signals: 4,
                concentration_ratio: 0.5,
                sentiment_shift_min: 0.2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Low sensitivity - higher cutoffs, fewer patterns
    pub fn low_sensitivity() -> Self {
        Self {
            validation: ValidationPolicy {
                accept_min: 0.7,
                review_min: 0.4,
                quarantine_min: 0.2,
                ..Default::default()
            },
            patterns: PatternThresholds {
                burst_min_signals: 8,
                burst_min_platforms: 3,
                concentration_ratio: 0.75,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Reject configurations whose tier cutoffs are out of order
    pub fn check(&self) -> EngineResult<()> {
        let v = &self.validation;
        if !(0.0..=1.0).contains(&v.accept_min)
            || v.accept_min < v.review_min
            || v.review_min < v.quarantine_min
            || v.quarantine_min < 0.0
        {
            return Err(EngineError::Config(format!(
                "tier cutoffs must satisfy 0 <= quarantine ({}) <= review ({}) <= accept ({}) <= 1",
                v.quarantine_min, v.review_min, v.accept_min
            )));
        }
        if !(0.0..=1.0).contains(&self.recommender.similarity_threshold) {
            return Err(EngineError::Config(
                "similarity threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.execution.action_timeout_ms == 0 {
            return Err(EngineError::Config("action timeout must be positive".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
