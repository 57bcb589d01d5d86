//! Recommender feature vector
//!
//! Layout (15 dimensions):
//! - 0-2: pattern flags (sentiment_shift, coordinated_attack, viral_risk)
//! - 3-5: high / medium / low impact fractions
//! - 6: mean pattern confidence
//! - 7-9: historical success rate (defensive, proactive, engagement)
//! - 10: entity risk score
//! - 11-12: share of history in the last 24h / 7d
//! - 13: platform diversity
//! - 14: detector coverage (fired detectors / 5)

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use super::rules::*;
use super::types::{HistoricalEvent, StrategyType};
use crate::logic::patterns::{DetectedPattern, PatternImpact, PatternKind};

pub const IDX_COORDINATED: usize = 1;
pub const IDX_HIGH_IMPACT: usize = 3;
pub const IDX_RISK: usize = 10;

/// Number of pattern detectors
const DETECTOR_COUNT: f64 = 5.0;

pub fn extract_features(patterns: &[DetectedPattern], history: &[HistoricalEvent], now: DateTime<Utc>) -> Vec<f64> {
    let mut features = Vec::with_capacity(FEATURE_COUNT);

    let has = |kind: PatternKind| if patterns.iter().any(|p| p.kind == kind) { 1.0 } else { 0.0 };
    features.push(has(PatternKind::SentimentShift));
    features.push(has(PatternKind::CoordinatedAttack));
    features.push(has(PatternKind::ViralRisk));

    let total = patterns.len().max(1) as f64;
    let share = |impact: PatternImpact| patterns.iter().filter(|p| p.impact == impact).count() as f64 / total;
    features.push(share(PatternImpact::High));
    features.push(share(PatternImpact::Medium));
    features.push(share(PatternImpact::Low));

    let mean_confidence = if patterns.is_empty() {
        0.0
    } else {
        patterns.iter().map(|p| p.confidence).sum::<f64>() / patterns.len() as f64
    };
    features.push(mean_confidence);

    features.push(type_success_rate(history, StrategyType::Defensive));
    features.push(type_success_rate(history, StrategyType::Proactive));
    features.push(type_success_rate(history, StrategyType::Engagement));

    features.push(entity_risk_score(patterns));

    let history_len = history.len().max(1) as f64;
    let since = |d: Duration| history.iter().filter(|h| h.occurred_at > now - d).count() as f64 / history_len;
    features.push(since(Duration::hours(24)));
    features.push(since(Duration::days(7)));

    let platforms: BTreeSet<&str> = history.iter().flat_map(|h| h.platforms.iter().map(String::as_str)).collect();
    features.push((platforms.len() as f64 / PLATFORM_DIVERSITY_SCALE).min(1.0));

    let fired: BTreeSet<PatternKind> = patterns.iter().map(|p| p.kind).collect();
    features.push(fired.len() as f64 / DETECTOR_COUNT);

    features
}

/// Share of executed strategies of this type that succeeded
pub fn type_success_rate(history: &[HistoricalEvent], strategy_type: StrategyType) -> f64 {
    let of_type: Vec<&HistoricalEvent> = history.iter().filter(|h| h.strategy_type == strategy_type).collect();
    if of_type.is_empty() {
        return NEUTRAL_SUCCESS_RATE;
    }
    of_type.iter().filter(|h| h.is_success()).count() as f64 / of_type.len() as f64
}

/// Mean of type weight x impact factor x confidence, capped at 1
pub fn entity_risk_score(patterns: &[DetectedPattern]) -> f64 {
    if patterns.is_empty() {
        return 0.0;
    }
    let total: f64 = patterns
        .iter()
        .map(|p| risk_weight(p.kind) * impact_factor(p.impact) * p.confidence)
        .sum();
    (total / patterns.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(kind: PatternKind, impact: PatternImpact, confidence: f64) -> DetectedPattern {
        DetectedPattern {
            kind,
            description: String::new(),
            confidence,
            timeframe: "1 hour".to_string(),
            impact,
            sources: vec!["reddit".to_string()],
        }
    }

    fn event(strategy_type: StrategyType, hours_ago: i64, executed: usize, failed: usize, now: DateTime<Utc>) -> HistoricalEvent {
        HistoricalEvent {
            strategy_type,
            occurred_at: now - Duration::hours(hours_ago),
            platforms: vec!["reddit".to_string(), "twitter".to_string()],
            executed_actions: executed,
            failed_actions: failed,
        }
    }

    #[test]
    fn test_empty_inputs() {
        let f = extract_features(&[], &[], Utc::now());
        assert_eq!(f.len(), FEATURE_COUNT);
        assert_eq!(&f[7..10], &[0.5, 0.5, 0.5]);
        assert_eq!(f[IDX_RISK], 0.0);
        assert_eq!(f[14], 0.0);
    }

    #[test]
    fn test_pattern_features() {
        let patterns = vec![
            pattern(PatternKind::CoordinatedAttack, PatternImpact::High, 0.9),
            pattern(PatternKind::PlatformMigration, PatternImpact::Medium, 0.7),
        ];
        let f = extract_features(&patterns, &[], Utc::now());
        assert_eq!(f[IDX_COORDINATED], 1.0);
        assert_eq!(f[0], 0.0);
        assert_eq!(f[IDX_HIGH_IMPACT], 0.5);
        assert_eq!(f[4], 0.5);
        assert!((f[6] - 0.8).abs() < 1e-9);
        // (0.9*1*0.9 + 0.5*0.6*0.7) / 2
        assert!((f[IDX_RISK] - 0.51).abs() < 1e-9);
        assert!((f[14] - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_history_features() {
        let now = Utc::now();
        let history = vec![
            event(StrategyType::Defensive, 2, 3, 0, now),
            event(StrategyType::Defensive, 100, 1, 2, now),
            event(StrategyType::Engagement, 400, 2, 1, now),
        ];
        let f = extract_features(&[], &history, now);
        assert_eq!(f[7], 0.5);
        assert_eq!(f[8], 0.5);
        assert_eq!(f[9], 1.0);
        assert!((f[11] - 1.0 / 3.0).abs() < 1e-9);
        assert!((f[12] - 2.0 / 3.0).abs() < 1e-9);
        assert!((f[13] - 0.2).abs() < 1e-9);
    }
}
