//! Central Configuration Constants
//!
//! Single source of truth for engine-wide defaults.
//! Policy thresholds live in `config.rs`; these are the knobs that are
//! not worth tuning per deployment.

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name
pub const ENGINE_NAME: &str = "intel-response";

/// Base confidence the classifier feeds into the validator
pub const CLASSIFIER_BASE_CONFIDENCE: f64 = 0.7;

/// Characters of content kept in an audit record preview
pub const CONTENT_PREVIEW_CHARS: usize = 200;

/// Learned patterns considered per entity during similarity lookup
pub const LEARNED_PATTERN_LOOKBACK: usize = 50;

/// Same-type history rows considered by the outcome predictor
pub const PREDICTION_HISTORY_LIMIT: usize = 20;

/// Prior strategies examined by the optimizer
pub const OPTIMIZER_HISTORY_LIMIT: usize = 10;

/// Pending strategies ranked by `best_strategies`
pub const BEST_STRATEGY_CANDIDATES: usize = 10;

/// Default number of strategies returned by `best_strategies`
pub const DEFAULT_BEST_STRATEGY_LIMIT: usize = 3;

/// Executed strategies fed back to the recommender per entity
pub const FEEDBACK_HISTORY_LIMIT: usize = 100;

/// Base confidence for signals validated during an engine cycle
pub const INGEST_BASE_CONFIDENCE: f64 = 0.5;

/// Default per-action dispatch timeout (milliseconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get action dispatch timeout from environment or use default
pub fn get_action_timeout_ms() -> u64 {
    std::env::var("INTEL_ACTION_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ACTION_TIMEOUT_MS)
}

/// Check if actions within one strategy may be dispatched concurrently
pub fn is_concurrent_dispatch_enabled() -> bool {
    std::env::var("INTEL_CONCURRENT_ACTIONS")
        .map(|s| s.to_lowercase() == "true" || s == "1")
        .unwrap_or(false)
}
