use chrono::{DateTime, Duration, TimeZone, Utc};

use super::detector::{insights, overall_confidence};
use super::*;
use crate::logic::signal::{NarrativeRecord, Signal};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
}

fn signal(id: usize, platform: &str, at: DateTime<Utc>) -> Signal {
    Signal::new(&format!("s-{}", id), "Acme Corp mention", platform, "Acme Corp", at)
}

fn kinds(patterns: &[DetectedPattern]) -> Vec<PatternKind> {
    patterns.iter().map(|p| p.kind).collect()
}

#[test]
fn test_empty_window_yields_nothing() {
    let detector = PatternDetector::default();
    assert!(detector.detect(&[], &[]).is_empty());
}

#[test]
fn test_coordinated_burst_within_one_hour() {
    let detector = PatternDetector::default();
    let signals: Vec<Signal> = (0..6)
        .map(|i| {
            let platform = if i % 2 == 0 { "reddit" } else { "twitter" };
            signal(i, platform, base_time() + Duration::minutes(i as i64 * 5))
        })
        .collect();

    let patterns = detector.detect(&signals, &[]);
    let burst = patterns
        .iter()
        .find(|p| p.kind == PatternKind::CoordinatedAttack)
        .expect("burst detected");

    assert!((burst.confidence - 0.9).abs() < 1e-9);
    assert_eq!(burst.impact, PatternImpact::High);
    assert_eq!(burst.sources, vec!["reddit".to_string(), "twitter".to_string()]);
}

#[test]
fn test_single_platform_burst_is_not_coordinated() {
    let detector = PatternDetector::default();
    let signals: Vec<Signal> = (0..6)
        .map(|i| signal(i, "reddit", base_time() + Duration::minutes(i as i64)))
        .collect();

    let patterns = detector.detect(&signals, &[]);
    assert_eq!(kinds(&patterns), vec![PatternKind::PlatformMigration]);
    assert_eq!(patterns[0].sources, vec!["reddit".to_string()]);
}

#[test]
fn test_detect_is_order_insensitive_and_idempotent() {
    let detector = PatternDetector::default();
    let mut signals: Vec<Signal> = (0..12)
        .map(|i| {
            let platform = ["reddit", "twitter", "news"][i % 3];
            let sentiment = if i < 6 { -0.6 } else { 0.4 };
            signal(i, platform, base_time() + Duration::minutes(i as i64 * 4)).with_sentiment(sentiment)
        })
        .collect();

    let first = detector.detect(&signals, &[]);
    let second = detector.detect(&signals, &[]);
    assert_eq!(first, second);

    signals.reverse();
    assert_eq!(detector.detect(&signals, &[]), first);
}

#[test]
fn test_sentiment_shift_direction_and_impact() {
    let detector = PatternDetector::default();
    // Older half negative, newer half positive, spread across days
    let signals: Vec<Signal> = (0..10)
        .map(|i| {
            let sentiment = if i < 5 { -0.5 } else { 0.3 };
            signal(i, "news", base_time() + Duration::days(i as i64)).with_sentiment(sentiment)
        })
        .collect();

    let patterns = detector.detect(&signals, &[]);
    let shift = patterns
        .iter()
        .find(|p| p.kind == PatternKind::SentimentShift)
        .expect("shift detected");

    assert!(shift.description.contains("positive"));
    assert_eq!(shift.impact, PatternImpact::High);
    assert!((shift.confidence - 0.95).abs() < 1e-9);
}

#[test]
fn test_sentiment_needs_minimum_window() {
    let detector = PatternDetector::default();
    let signals: Vec<Signal> = (0..9)
        .map(|i| {
            let sentiment = if i < 4 { -1.0 } else { 1.0 };
            signal(i, ["a", "b", "c"][i % 3], base_time() + Duration::days(i as i64)).with_sentiment(sentiment)
        })
        .collect();

    let patterns = detector.detect(&signals, &[]);
    assert!(!kinds(&patterns).contains(&PatternKind::SentimentShift));
}

#[test]
fn test_viral_risk_window_anchored_on_newest_signal() {
    let detector = PatternDetector::default();
    let mut signals: Vec<Signal> = (0..21)
        .map(|i| {
            let platform = ["reddit", "twitter", "tiktok"][i % 3];
            signal(i, platform, base_time() + Duration::hours(i as i64)).with_reach(5000.0)
        })
        .collect();

    // 21 signals within 24h of the newest
    let patterns = detector.detect(&signals, &[]);
    let viral = patterns.iter().find(|p| p.kind == PatternKind::ViralRisk).expect("viral");
    assert!((viral.confidence - 0.63).abs() < 1e-9);

    // One old signal falls outside the window, leaving exactly 20 inside
    signals[0].timestamp = base_time() - Duration::days(3);
    let patterns = detector.detect(&signals, &[]);
    assert!(!kinds(&patterns).contains(&PatternKind::ViralRisk));
}

#[test]
fn test_low_reach_is_not_viral() {
    let detector = PatternDetector::default();
    let signals: Vec<Signal> = (0..30)
        .map(|i| {
            signal(i, ["reddit", "twitter", "tiktok"][i % 3], base_time() + Duration::minutes(i as i64 * 40))
                .with_reach(200.0)
        })
        .collect();

    let patterns = detector.detect(&signals, &[]);
    assert!(!kinds(&patterns).contains(&PatternKind::ViralRisk));
}

#[test]
fn test_non_finite_values_count_as_missing() {
    let detector = PatternDetector::default();

    let signals: Vec<Signal> = (0..10)
        .map(|i| {
            let sentiment = if i < 5 { 0.0 } else { f64::NAN };
            signal(i, "news", base_time() + Duration::days(i as i64)).with_sentiment(sentiment)
        })
        .collect();
    let patterns = detector.detect(&signals, &[]);
    assert!(!kinds(&patterns).contains(&PatternKind::SentimentShift));

    let signals: Vec<Signal> = (0..30)
        .map(|i| {
            let reach = match i {
                0 => f64::INFINITY,
                1 => f64::NAN,
                _ => 200.0,
            };
            signal(i, ["reddit", "twitter", "tiktok"][i % 3], base_time() + Duration::minutes(i as i64 * 40))
                .with_reach(reach)
        })
        .collect();
    let patterns = detector.detect(&signals, &[]);
    assert!(!kinds(&patterns).contains(&PatternKind::ViralRisk));
    assert!(patterns.iter().all(|p| !p.description.contains("NaN") && p.confidence.is_finite()));
}

#[test]
fn test_influencer_involvement() {
    let detector = PatternDetector::default();
    let narratives = vec![
        NarrativeRecord {
            id: "n-1".to_string(),
            entity_name: "Acme Corp".to_string(),
            influence_score: Some(0.9),
            source_platform: Some("youtube".to_string()),
            created_at: base_time(),
        },
        NarrativeRecord {
            id: "n-2".to_string(),
            entity_name: "Acme Corp".to_string(),
            influence_score: Some(0.7),
            source_platform: Some("twitter".to_string()),
            created_at: base_time(),
        },
    ];

    let patterns = detector.detect(&[], &narratives);
    assert_eq!(kinds(&patterns), vec![PatternKind::InfluencerInvolvement]);
    assert_eq!(patterns[0].sources, vec!["youtube".to_string()]);
    assert_eq!(patterns[0].confidence, 0.8);
}

#[test]
fn test_thresholds_are_tunable() {
    let detector = PatternDetector::new(PatternThresholds {
        burst_min_signals: 3,
        ..Default::default()
    });
    let signals: Vec<Signal> = (0..3)
        .map(|i| signal(i, if i == 0 { "reddit" } else { "twitter" }, base_time()))
        .collect();

    let patterns = detector.detect(&signals, &[]);
    assert!(kinds(&patterns).contains(&PatternKind::CoordinatedAttack));
}

#[test]
fn test_analysis_without_patterns() {
    let analysis = PatternDetector::default().analyze(&[], &[]);
    assert!(analysis.patterns.is_empty());
    assert_eq!(analysis.confidence, 0.9);
    assert_eq!(analysis.insights.len(), 2);
    assert_eq!(analysis.recommendations.len(), 1);
}

#[test]
fn test_overall_confidence_rounds_to_two_places() {
    let make = |confidence| DetectedPattern {
        kind: PatternKind::PlatformMigration,
        description: String::new(),
        confidence,
        timeframe: "30 days".to_string(),
        impact: PatternImpact::Medium,
        sources: vec!["reddit".to_string()],
    };
    assert_eq!(overall_confidence(&[make(0.7), make(0.8), make(0.85)]), 0.78);

    let text = insights(&[make(0.7)]);
    assert_eq!(text[0], "1 significant patterns identified requiring attention");
    assert_eq!(text[1], "Activity spans 1 platforms: reddit");
}
