//! Plan metrics
//!
//! Heuristic scores over a plan's platforms and steps, all in [0, 1].

use std::collections::HashSet;

use super::rules::{has_synergy, platform_reach, BALANCED_ACTIONS_PER_STRATEGY};
use super::types::{CoordinationMetrics, CoordinationPlan};

pub fn compute_metrics(plan: &CoordinationPlan) -> CoordinationMetrics {
    CoordinationMetrics {
        overall_reach: overall_reach(&plan.platforms),
        platform_synergy: platform_synergy(&plan.platforms),
        message_consistency: message_consistency(plan),
        resource_efficiency: resource_efficiency(plan),
    }
}

/// Mean per-platform reach
pub fn overall_reach(platforms: &[String]) -> f64 {
    if platforms.is_empty() {
        return 0.0;
    }
    let total: f64 = platforms.iter().map(|p| platform_reach(p)).sum();
    (total / platforms.len() as f64).min(1.0)
}

/// Share of ordered platform pairs where the first amplifies the second
pub fn platform_synergy(platforms: &[String]) -> f64 {
    let mut hits = 0usize;
    let mut pairs = 0usize;
    for a in platforms {
        for b in platforms {
            if a != b {
                pairs += 1;
                if has_synergy(a, b) {
                    hits += 1;
                }
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        hits as f64 / pairs as f64
    }
}

/// 1 when every step shares a strategy type, falling with each extra type
pub fn message_consistency(plan: &CoordinationPlan) -> f64 {
    if plan.steps.is_empty() {
        return 0.0;
    }
    let unique: HashSet<_> = plan.steps.iter().map(|s| s.strategy_type).collect();
    let denom = plan.steps.len().saturating_sub(1).max(1) as f64;
    1.0 - (unique.len() - 1) as f64 / denom
}

/// Peaks at three actions per strategy
pub fn resource_efficiency(plan: &CoordinationPlan) -> f64 {
    if plan.steps.is_empty() {
        return 0.0;
    }
    let total: usize = plan.steps.iter().map(|s| s.action_count).sum();
    let avg = total as f64 / plan.steps.len() as f64;
    (1.0 - (avg - BALANCED_ACTIONS_PER_STRATEGY).abs() / 10.0).clamp(0.0, 1.0)
}
