//! Coordination Rules
//!
//! Timeframe parsing constants, per-platform reach and synergy tables,
//! and the plan failure policy.

use serde::{Deserialize, Serialize};

// ============================================================================
// TIMELINE
// ============================================================================

pub const IMMEDIATE_HOURS: u32 = 1;
pub const HOUR_BAND_HOURS: u32 = 24;
pub const HOURS_PER_DAY: u32 = 24;
/// Timeframes that name no unit
pub const DEFAULT_TIMEFRAME_HOURS: u32 = 48;

// ============================================================================
// PLATFORM TABLES
// ============================================================================

/// Reach for platforms missing from `PLATFORM_REACH`
pub const DEFAULT_PLATFORM_REACH: f64 = 0.5;

pub const PLATFORM_REACH: &[(&str, f64)] = &[
    ("twitter", 0.8),
    ("facebook", 0.9),
    ("linkedin", 0.6),
    ("reddit", 0.7),
    ("instagram", 0.75),
];

/// Directed: content on the key platform amplifies the listed ones
pub const PLATFORM_SYNERGY: &[(&str, &[&str])] = &[
    ("twitter", &["linkedin", "facebook"]),
    ("facebook", &["instagram", "twitter"]),
    ("linkedin", &["twitter"]),
    ("reddit", &[]),
    ("instagram", &["facebook", "twitter"]),
];

/// Actions per strategy considered balanced
pub const BALANCED_ACTIONS_PER_STRATEGY: f64 = 3.0;

pub fn platform_reach(platform: &str) -> f64 {
    PLATFORM_REACH
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, r)| *r)
        .unwrap_or(DEFAULT_PLATFORM_REACH)
}

pub fn has_synergy(from: &str, to: &str) -> bool {
    PLATFORM_SYNERGY
        .iter()
        .find(|(p, _)| *p == from)
        .map_or(false, |(_, targets)| targets.contains(&to))
}

// ============================================================================
// POLICY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationPolicy {
    /// Skip (and fail) every step after a failed critical strategy
    pub halt_on_critical_failure: bool,
}
