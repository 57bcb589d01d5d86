//! Pattern Detection Rules & Thresholds
//!
//! Window sizes, minimum counts and confidence curves for the detectors.
//! No detection logic here - only constants and config.

use serde::{Deserialize, Serialize};

// ============================================================================
// SENTIMENT SHIFT
// ============================================================================

/// Signals required before halves are compared
pub const MIN_SIGNALS_FOR_SHIFT: usize = 10;

/// Absolute mean delta that counts as a shift
pub const SENTIMENT_SHIFT_MIN: f64 = 0.3;

/// Delta above which the shift is high impact
pub const SENTIMENT_SHIFT_HIGH: f64 = 0.5;

pub const SENTIMENT_CONFIDENCE_CAP: f64 = 0.95;

// ============================================================================
// COORDINATED ACTIVITY
// ============================================================================

/// Signals within one UTC hour
pub const BURST_MIN_SIGNALS: usize = 5;

/// Distinct platforms within that hour
pub const BURST_MIN_PLATFORMS: usize = 2;

pub const BURST_CONFIDENCE_PER_SIGNAL: f64 = 0.15;
pub const BURST_CONFIDENCE_CAP: f64 = 0.9;

// ============================================================================
// VIRAL RISK
// ============================================================================

/// Signals in the trailing 24h must exceed this
pub const VIRAL_MIN_COUNT: usize = 20;

/// Mean reach in that window must exceed this
pub const VIRAL_MIN_REACH: f64 = 1000.0;

pub const VIRAL_CONFIDENCE_PER_SIGNAL: f64 = 0.03;
pub const VIRAL_CONFIDENCE_CAP: f64 = 0.85;

// ============================================================================
// CONCENTRATION / INFLUENCE
// ============================================================================

/// Share of window volume on one platform
pub const CONCENTRATION_RATIO: f64 = 0.6;
pub const CONCENTRATION_CONFIDENCE: f64 = 0.7;

/// Narrative influence score above which it counts
pub const INFLUENCE_MIN: f64 = 0.7;
pub const INFLUENCE_CONFIDENCE: f64 = 0.8;

/// Reported when no pattern fires
pub const NO_PATTERN_CONFIDENCE: f64 = 0.9;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    pub min_signals_for_shift: usize,
    pub sentiment_shift_min: f64,
    pub sentiment_shift_high: f64,
    pub burst_min_signals: usize,
    pub burst_min_platforms: usize,
    pub viral_min_count: usize,
    pub viral_min_reach: f64,
    pub concentration_ratio: f64,
    pub influence_min: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            min_signals_for_shift: MIN_SIGNALS_FOR_SHIFT,
            sentiment_shift_min: SENTIMENT_SHIFT_MIN,
            sentiment_shift_high: SENTIMENT_SHIFT_HIGH,
            burst_min_signals: BURST_MIN_SIGNALS,
            burst_min_platforms: BURST_MIN_PLATFORMS,
            viral_min_count: VIRAL_MIN_COUNT,
            viral_min_reach: VIRAL_MIN_REACH,
            concentration_ratio: CONCENTRATION_RATIO,
            influence_min: INFLUENCE_MIN,
        }
    }
}
