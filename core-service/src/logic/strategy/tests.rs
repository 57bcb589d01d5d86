use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use super::optimizer::optimize_with_history;
use super::predictor::{predicted_outcome, time_to_complete};
use super::*;
use crate::error::EngineError;
use crate::logic::patterns::{DetectedPattern, PatternImpact, PatternKind};
use crate::storage::{
    LearnedPatternStore, MemoryPersistence, Persistence, PredictionFilter, SortOrder, StoreError, StoreResult,
    StrategyFilter,
};

// ============================================================================
// FIXTURES
// ============================================================================

fn pattern(kind: PatternKind, impact: PatternImpact, confidence: f64) -> DetectedPattern {
    DetectedPattern {
        kind,
        description: format!("{} detected", kind.as_str()),
        confidence,
        timeframe: "1 hour".to_string(),
        impact,
        sources: vec!["reddit".to_string(), "twitter".to_string()],
    }
}

fn strategy(
    id: &str,
    strategy_type: StrategyType,
    priority: StrategyPriority,
    action_count: usize,
    resource_count: usize,
) -> ResponseStrategy {
    let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
    ResponseStrategy {
        id: id.to_string(),
        entity_name: "Acme Corp".to_string(),
        strategy_type,
        title: "Test Strategy".to_string(),
        description: "Strategy under test".to_string(),
        actions: (0..action_count)
            .map(|i| StrategyAction::new(ActionKind::Generic, &format!("step {}", i), "6 hours", "Content Team", "KPI"))
            .collect(),
        priority,
        timeframe: "24-48 hours".to_string(),
        resources: (0..resource_count).map(|i| format!("Team {}", i)).collect(),
        status: StrategyStatus::Pending,
        source_pattern: None,
        derived_from: None,
        improvements: Vec::new(),
        created_at: now,
        updated_at: now,
        executed_at: None,
        completed_at: None,
        execution: None,
    }
}

/// Mark a strategy as executed with the given counts, finishing after `hours`
fn executed(mut s: ResponseStrategy, executed: usize, failed: usize, hours: i64) -> ResponseStrategy {
    let completed_at = s.created_at + Duration::hours(hours);
    s.status = if failed == 0 {
        StrategyStatus::Completed
    } else if executed > 0 {
        StrategyStatus::Partial
    } else {
        StrategyStatus::Cancelled
    };
    s.completed_at = Some(completed_at);
    s.execution = Some(ExecutionRecord {
        executed_actions: executed,
        failed_actions: failed,
        outcomes: Vec::new(),
        started_at: s.created_at,
        completed_at,
        fault: None,
    });
    s
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

struct FailingPatternStore;

#[async_trait]
impl LearnedPatternStore for FailingPatternStore {
    async fn insert(&self, _pattern: LearnedPattern) -> StoreResult<()> {
        Err(StoreError::Backend("unavailable".to_string()))
    }

    async fn recent(&self, _entity_name: &str, _limit: usize) -> StoreResult<Vec<LearnedPattern>> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
}

// ============================================================================
// RECOMMENDER
// ============================================================================

#[tokio::test]
async fn test_coordinated_attack_recommends_counter_narrative() {
    let store = Arc::new(MemoryPersistence::new());
    let recommender = StrategyRecommender::new(RecommenderPolicy::default(), store.clone());
    let patterns = vec![pattern(PatternKind::CoordinatedAttack, PatternImpact::High, 0.9)];

    let rec = recommender.recommend("Acme Corp", &patterns, &[]).await;

    assert_eq!(rec.strategy_type, StrategyType::CounterNarrative);
    assert!(approx(rec.confidence, 0.8));
    assert!(approx(rec.expected_outcome, 0.64));
    assert_eq!(
        rec.risk_factors,
        vec![
            "High impact coordinated attack".to_string(),
            "High confidence detection of coordinated attack".to_string(),
        ]
    );

    let learned = store.learned_patterns().recent("Acme Corp", 10).await.unwrap();
    assert_eq!(learned.len(), 1);
    assert_eq!(learned[0].features.len(), rules::FEATURE_COUNT);
    assert_eq!(learned[0].optimal_strategy, StrategyType::CounterNarrative);
}

#[tokio::test]
async fn test_similar_situation_reuses_learned_pattern() {
    let store = Arc::new(MemoryPersistence::new());
    let recommender = StrategyRecommender::new(RecommenderPolicy::default(), store.clone());
    let patterns = vec![pattern(PatternKind::CoordinatedAttack, PatternImpact::High, 0.9)];

    recommender.recommend("Acme Corp", &patterns, &[]).await;
    let second = recommender.recommend("Acme Corp", &patterns, &[]).await;

    // 0.8 from the rule table, times the reuse penalty
    assert_eq!(second.strategy_type, StrategyType::CounterNarrative);
    assert!(approx(second.confidence, 0.64));
    assert!(approx(second.expected_outcome, 0.64));
    assert!(second.reasoning.starts_with("Based on similar historical patterns"));
    assert_eq!(store.learned_patterns().recent("Acme Corp", 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_learned_patterns_are_per_entity() {
    let store = Arc::new(MemoryPersistence::new());
    let recommender = StrategyRecommender::new(RecommenderPolicy::default(), store.clone());
    let patterns = vec![pattern(PatternKind::CoordinatedAttack, PatternImpact::High, 0.9)];

    recommender.recommend("Acme Corp", &patterns, &[]).await;
    let other = recommender.recommend("Globex", &patterns, &[]).await;

    assert!(approx(other.confidence, 0.8));
}

#[tokio::test]
async fn test_quiet_entity_gets_engagement() {
    let store = Arc::new(MemoryPersistence::new());
    let recommender = StrategyRecommender::new(RecommenderPolicy::default(), store);

    let rec = recommender.recommend("Acme Corp", &[], &[]).await;

    assert_eq!(rec.strategy_type, StrategyType::Engagement);
    assert!(approx(rec.confidence, 0.6));
    assert!(rec.risk_factors.is_empty());
}

#[tokio::test]
async fn test_lookup_failure_degrades_to_fallback() {
    let store = Arc::new(MemoryPersistence::new().with_learned_pattern_store(Arc::new(FailingPatternStore)));
    let recommender = StrategyRecommender::new(RecommenderPolicy::default(), store);
    let patterns = vec![pattern(PatternKind::ViralRisk, PatternImpact::High, 0.85)];

    let rec = recommender.recommend("Acme Corp", &patterns, &[]).await;

    assert_eq!(rec.strategy_type, StrategyType::Defensive);
    assert!(approx(rec.confidence, 0.5));
    assert_eq!(rec.risk_factors, vec!["Analysis incomplete".to_string()]);
}

#[test]
fn test_rule_table_proactive_branch() {
    let mut features = vec![0.0; rules::FEATURE_COUNT];
    features[features::IDX_HIGH_IMPACT] = 1.0;
    features[features::IDX_RISK] = 0.8;

    let rec = recommender::rule_based(&features, &[]);
    assert_eq!(rec.strategy_type, StrategyType::Proactive);
    assert!(approx(rec.expected_outcome, 0.56));
}

#[test]
fn test_rule_table_defensive_default() {
    let mut features = vec![0.0; rules::FEATURE_COUNT];
    features[features::IDX_RISK] = 0.5;

    let rec = recommender::rule_based(&features, &[]);
    assert_eq!(rec.strategy_type, StrategyType::Defensive);
    assert!(approx(rec.confidence, 0.6));
}

// ============================================================================
// GENERATOR
// ============================================================================

#[test]
fn test_no_patterns_yields_baseline() {
    let strategies = build_strategies("Acme Corp", &[], Utc::now());

    assert_eq!(strategies.len(), 1);
    let baseline = &strategies[0];
    assert!(baseline.id.starts_with("baseline-"));
    assert_eq!(baseline.priority, StrategyPriority::Low);
    assert_eq!(baseline.strategy_type, StrategyType::Proactive);
    assert_eq!(baseline.actions.len(), 3);
    assert_eq!(baseline.status, StrategyStatus::Pending);
    assert!(baseline.source_pattern.is_none());
}

#[test]
fn test_one_strategy_per_pattern() {
    let patterns = vec![
        pattern(PatternKind::SentimentShift, PatternImpact::Medium, 0.6),
        pattern(PatternKind::CoordinatedAttack, PatternImpact::High, 0.9),
        pattern(PatternKind::PlatformMigration, PatternImpact::Medium, 0.7),
    ];

    let strategies = build_strategies("Acme Corp", &patterns, Utc::now());
    let types: Vec<StrategyType> = strategies.iter().map(|s| s.strategy_type).collect();
    assert_eq!(
        types,
        vec![StrategyType::CounterNarrative, StrategyType::Defensive, StrategyType::Proactive]
    );

    let sentiment = &strategies[0];
    assert_eq!(sentiment.priority, StrategyPriority::High);
    assert_eq!(sentiment.timeframe, "48-72 hours");

    let defensive = &strategies[1];
    assert_eq!(defensive.priority, StrategyPriority::Critical);
    assert_eq!(defensive.actions[0].kind, ActionKind::FileReport);
    assert_eq!(defensive.actions[0].platforms, vec!["reddit".to_string(), "twitter".to_string()]);
    assert!(defensive.actions[1].platforms.is_empty());
    assert_eq!(defensive.source_pattern, Some(PatternKind::CoordinatedAttack));

    assert_eq!(strategies[2].actions.len(), 2);
}

#[test]
fn test_high_impact_sentiment_is_critical() {
    let patterns = vec![pattern(PatternKind::SentimentShift, PatternImpact::High, 0.9)];
    let strategies = build_strategies("Acme Corp", &patterns, Utc::now());
    assert_eq!(strategies[0].priority, StrategyPriority::Critical);
}

#[tokio::test]
async fn test_generate_persists_pending_strategies() {
    let store = Arc::new(MemoryPersistence::new());
    let generator = StrategyGenerator::new(store.clone());
    let patterns = vec![
        pattern(PatternKind::ViralRisk, PatternImpact::High, 0.85),
        pattern(PatternKind::InfluencerInvolvement, PatternImpact::High, 0.8),
    ];

    let generated = generator.generate("Acme Corp", &patterns).await.unwrap();

    let stored = store
        .strategies()
        .query(
            &StrategyFilter::for_entity("Acme Corp").with_status(StrategyStatus::Pending),
            SortOrder::OldestFirst,
            10,
        )
        .await
        .unwrap();
    assert_eq!(stored, generated);
    assert_eq!(stored[1].strategy_type, StrategyType::Engagement);
}

// ============================================================================
// PREDICTOR
// ============================================================================

#[test]
fn test_prediction_without_history() {
    let s = strategy("s-1", StrategyType::Defensive, StrategyPriority::Critical, 2, 3);
    let p = predict(&s, "Acme Corp", &[], Utc::now());

    assert!(approx(p.metrics.success_probability, 0.7));
    assert!(approx(p.metrics.time_to_complete, 4.0));
    assert!(approx(p.metrics.resource_requirement, 1.0));
    assert!(approx(p.metrics.risk_level, 0.6));
    assert!(approx(p.metrics.confidence_score, 0.41));
    assert_eq!(p.predicted_outcome, PredictedOutcome::Failure);
    assert_eq!(
        p.recommendations,
        vec![
            "Ensure adequate resource allocation".to_string(),
            "Consider breaking into smaller phases".to_string(),
        ]
    );
    assert_eq!(
        p.alternatives,
        vec!["Simplified action plan".to_string(), "Automated response deployment".to_string()]
    );
}

#[test]
fn test_success_probability_from_history() {
    let s = strategy("s-1", StrategyType::Defensive, StrategyPriority::Critical, 2, 0);
    let history = vec![
        executed(strategy("h-1", StrategyType::Defensive, StrategyPriority::Low, 2, 0), 2, 0, 2),
        executed(strategy("h-2", StrategyType::Defensive, StrategyPriority::Low, 2, 0), 2, 0, 6),
        executed(strategy("h-3", StrategyType::Defensive, StrategyPriority::Low, 2, 0), 2, 0, 4),
        executed(strategy("h-4", StrategyType::Defensive, StrategyPriority::Low, 2, 0), 0, 2, 1),
    ];

    let p = predict(&s, "Acme Corp", &history, Utc::now());

    // 3/4 successful, critical bonus
    assert!(approx(p.metrics.success_probability, 0.825));
    // only the completed rows count toward duration
    assert!(approx(p.metrics.time_to_complete, 4.0));
    assert!(approx(p.metrics.confidence_score, 0.5 * 0.4 + 0.3 * 0.825 + 0.2));
}

#[test]
fn test_success_probability_is_capped_and_penalized() {
    let history: Vec<ResponseStrategy> = (0..10)
        .map(|i| {
            executed(
                strategy(&format!("h-{}", i), StrategyType::Proactive, StrategyPriority::Low, 1, 0),
                1,
                0,
                8,
            )
        })
        .collect();

    let critical = strategy("s-1", StrategyType::Proactive, StrategyPriority::Critical, 2, 0);
    assert!(approx(predict(&critical, "Acme Corp", &history, Utc::now()).metrics.success_probability, 0.95));

    let complex = strategy("s-2", StrategyType::Proactive, StrategyPriority::Low, 6, 0);
    assert!(approx(predict(&complex, "Acme Corp", &history, Utc::now()).metrics.success_probability, 0.9));
}

#[test]
fn test_time_defaults_per_type() {
    assert!(approx(time_to_complete(StrategyType::Legal, &[]), 24.0));
    assert!(approx(time_to_complete(StrategyType::Engagement, &[]), 12.0));
    assert!(approx(time_to_complete(StrategyType::CounterNarrative, &[]), 6.0));
}

#[test]
fn test_outcome_bands() {
    let strong = PredictionMetrics {
        success_probability: 0.95,
        time_to_complete: 2.0,
        resource_requirement: 0.5,
        risk_level: 0.3,
        confidence_score: 1.0,
    };
    assert_eq!(predicted_outcome(&strong), PredictedOutcome::Success);

    let middling = PredictionMetrics {
        success_probability: 0.7,
        resource_requirement: 0.8,
        risk_level: 0.4,
        confidence_score: 0.5,
        ..strong.clone()
    };
    assert_eq!(predicted_outcome(&middling), PredictedOutcome::Partial);
}

#[tokio::test]
async fn test_prediction_is_persisted() {
    let store = Arc::new(MemoryPersistence::new());
    let predictor = OutcomePredictor::new(store.clone());
    let s = strategy("s-1", StrategyType::Engagement, StrategyPriority::Medium, 3, 2);
    store.strategies().insert(s.clone()).await.unwrap();

    let p = predictor.predict_by_id("s-1").await.unwrap();

    let stored = store
        .predictions()
        .query(
            &PredictionFilter {
                strategy_id: Some("s-1".to_string()),
                ..Default::default()
            },
            SortOrder::NewestFirst,
            10,
        )
        .await
        .unwrap();
    assert_eq!(stored, vec![p]);
}

#[tokio::test]
async fn test_predict_unknown_strategy_is_not_found() {
    let predictor = OutcomePredictor::new(Arc::new(MemoryPersistence::new()));
    assert!(matches!(
        predictor.predict_by_id("missing").await,
        Err(EngineError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_best_strategies_ranks_by_success() {
    let store = Arc::new(MemoryPersistence::new());
    let predictor = OutcomePredictor::new(store.clone());

    // Engagement has only failed before
    for i in 0..3 {
        let failed = executed(
            strategy(&format!("h-{}", i), StrategyType::Engagement, StrategyPriority::Low, 2, 0),
            0,
            2,
            1,
        );
        store.strategies().insert(failed).await.unwrap();
    }
    store
        .strategies()
        .insert(strategy("defensive", StrategyType::Defensive, StrategyPriority::Low, 2, 0))
        .await
        .unwrap();
    store
        .strategies()
        .insert(strategy("engagement", StrategyType::Engagement, StrategyPriority::Low, 2, 0))
        .await
        .unwrap();

    let best = predictor.best_strategies("Acme Corp", 1).await.unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].id, "defensive");

    let all = predictor.best_strategies("Acme Corp", 5).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["defensive", "engagement"]);
}

// ============================================================================
// OPTIMIZER
// ============================================================================

#[tokio::test]
async fn test_optimize_unknown_strategy_is_not_found() {
    let optimizer = StrategyOptimizer::new(Arc::new(MemoryPersistence::new()));
    assert!(matches!(
        optimizer.optimize("missing").await,
        Err(EngineError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_optimize_derives_new_pending_copy() {
    let store = Arc::new(MemoryPersistence::new());
    let optimizer = StrategyOptimizer::new(store.clone());
    let patterns = vec![pattern(PatternKind::SentimentShift, PatternImpact::Medium, 0.6)];
    let original = build_strategies("Acme Corp", &patterns, Utc::now()).remove(0);
    store.strategies().insert(original.clone()).await.unwrap();

    let result = optimizer.optimize(&original.id).await.unwrap();
    let optimized = &result.optimized;

    assert_eq!(optimized.id, format!("{}-optimized", original.id));
    assert_eq!(optimized.derived_from.as_deref(), Some(original.id.as_str()));
    assert_eq!(optimized.title, "Sentiment Recovery Campaign (Optimized)");
    assert_eq!(optimized.priority, StrategyPriority::Critical);
    assert_eq!(optimized.timeframe, "24-48 hours");
    assert_eq!(optimized.actions[0].timeline, "4 hours");
    assert_eq!(optimized.actions[0].responsible, "AI-Assisted Content Team");
    assert_eq!(optimized.actions[0].kpi, "Real-time sentiment tracking with 15-min intervals");
    assert_eq!(optimized.actions[1].timeline, "8 hours");
    assert_eq!(optimized.actions[2].timeline, "Ongoing");
    assert_eq!(optimized.resources.len(), original.resources.len() + 2);
    assert_eq!(optimized.status, StrategyStatus::Pending);

    // only the timeframe tag applies without history
    assert_eq!(
        result.improvements,
        vec!["Adjusted timeframe based on platform response patterns".to_string()]
    );
    assert!(approx(result.confidence, 0.75));

    let stored_original = store.strategies().get(&original.id).await.unwrap().unwrap();
    assert_eq!(stored_original, original);
    assert!(store.strategies().get(&optimized.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_repeat_optimization_gets_next_generation() {
    let store = Arc::new(MemoryPersistence::new());
    let optimizer = StrategyOptimizer::new(store.clone());
    let original = strategy("s-1", StrategyType::Engagement, StrategyPriority::Medium, 2, 4);
    store.strategies().insert(original.clone()).await.unwrap();

    let first = optimizer.optimize("s-1").await.unwrap();
    let second = optimizer.optimize("s-1").await.unwrap();
    let third = optimizer.optimize("s-1").await.unwrap();

    assert_eq!(first.optimized.id, "s-1-optimized");
    assert_eq!(second.optimized.id, "s-1-optimized-2");
    assert_eq!(third.optimized.id, "s-1-optimized-3");
    assert_eq!(second.optimized.derived_from.as_deref(), Some("s-1"));

    for id in ["s-1-optimized", "s-1-optimized-2", "s-1-optimized-3"] {
        let stored = store.strategies().get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, StrategyStatus::Pending);
    }
}

#[test]
fn test_optimizer_confidence_is_capped() {
    let original = strategy("s-1", StrategyType::Engagement, StrategyPriority::Medium, 2, 4);
    let history: Vec<ResponseStrategy> = (0..6)
        .map(|i| {
            executed(
                strategy(&format!("h-{}", i), StrategyType::Engagement, StrategyPriority::Low, 2, 0),
                2,
                0,
                3,
            )
        })
        .collect();

    let result = optimize_with_history(&original, &history, Utc::now());

    assert_eq!(result.improvements.len(), 4);
    assert!(approx(result.confidence, 0.95));
    assert_eq!(result.optimized.priority, StrategyPriority::High);
    assert_eq!(result.optimized.improvements, result.improvements);
}

#[test]
fn test_critical_priority_saturates() {
    let original = strategy("s-1", StrategyType::Defensive, StrategyPriority::Critical, 1, 0);
    let result = optimize_with_history(&original, &[], Utc::now());
    assert_eq!(result.optimized.priority, StrategyPriority::Critical);
}
