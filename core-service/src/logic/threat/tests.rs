use std::sync::Arc;

use super::classifier::{analyst_pass, context_relevance, impact_level, recommendations, strategist_pass, validator_pass};
use super::*;
use crate::logic::validation::{ConfidenceValidator, ValidationPolicy};
use crate::storage::{AuditFilter, MemoryPersistence, Persistence, SortOrder};

fn classifier() -> (Arc<MemoryPersistence>, MultiAgentClassifier) {
    let store = Arc::new(MemoryPersistence::new());
    let validator = Arc::new(ConfidenceValidator::new(ValidationPolicy::default(), store.clone()));
    (store, MultiAgentClassifier::new(validator))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// SEVERITY / BANDS
// ============================================================================

#[test]
fn test_severity_extremes() {
    assert_eq!(severity_score(1.0, 1.0, 1.0), 10);
    assert_eq!(severity_score(0.0, 0.0, 0.0), 0);
}

#[test]
fn test_severity_is_clamped() {
    assert_eq!(severity_score(5.0, 5.0, 5.0), 10);
    assert_eq!(severity_score(-1.0, -1.0, -1.0), 0);
    assert_eq!(severity_score(f64::NAN, 0.5, 0.5), 0);
}

#[test]
fn test_recommendation_bands() {
    assert_eq!(recommendations(3, false), vec!["Standard monitoring", "Document for patterns"]);
    assert_eq!(recommendations(5, false)[0], "Enhanced monitoring");
    let severe = recommendations(9, true);
    assert_eq!(severe.len(), 4);
    assert_eq!(severe[0], "Immediate escalation required");
    assert_eq!(severe[3], "Executive team notification");
}

#[test]
fn test_impact_levels() {
    assert_eq!(impact_level(0.8), ImpactLevel::Critical);
    assert_eq!(impact_level(0.6), ImpactLevel::High);
    assert_eq!(impact_level(0.4), ImpactLevel::Medium);
    assert_eq!(impact_level(0.39), ImpactLevel::Low);
}

// ============================================================================
// AGENTS
// ============================================================================

#[test]
fn test_intent_ties_favor_first_category() {
    let lexicon = ThreatLexicon::default();
    let analyst = analyst_pass("worried about the scam", 22, "Acme", "reddit", &lexicon);
    assert_eq!(analyst.intent, Intent::Attack);
    assert_eq!(analyst.intent_hits, 1);
    assert_eq!(analyst.key_indicators, vec!["scam".to_string()]);
}

#[test]
fn test_no_keywords_is_neutral() {
    let lexicon = ThreatLexicon::default();
    let analyst = analyst_pass("acme corp opened an office", 26, "Acme Corp", "unknown", &lexicon);
    assert_eq!(analyst.intent, Intent::Neutral);
    assert_eq!(analyst.intent_confidence, 0.0);
    assert_eq!(analyst.platform_weight, 0.5);
    // 0.3 * 0.5 + 0.2 * 1 mention
    assert!(approx(analyst.estimated_impact, 0.35));
}

#[test]
fn test_context_relevance() {
    assert!(approx(context_relevance("acme lawsuit news", "Acme lawsuit filed"), 2.0 / 3.0));
    assert!(approx(context_relevance("anything", "   "), 0.5));

    let lexicon = ThreatLexicon::default();
    let analyst = analyst_pass("acme news", 9, "Acme", "news", &lexicon);
    let without = validator_pass("acme news", &analyst, None, &lexicon);
    assert!(approx(without.context_relevance, 0.5));
}

#[test]
fn test_strategist_resources_grow_with_priority() {
    let lexicon = ThreatLexicon::default();
    let content = "acme corp fraud scam exposed";
    let analyst = analyst_pass(content, content.len(), "Acme Corp", "twitter", &lexicon);
    let validator = validator_pass(content, &analyst, None, &lexicon);
    let strategist = strategist_pass(&analyst, &validator);

    assert_eq!(strategist.tier, ResponseTier::Immediate);
    assert_eq!(strategist.timeline, "< 1 hour");
    assert!(strategist.escalation_required);
    assert_eq!(strategist.resources.len(), 5);
}

#[test]
fn test_custom_lexicon() {
    let mut lexicon = ThreatLexicon::default();
    lexicon.platform_weights.insert("mastodon".to_string(), 0.9);
    let analyst = analyst_pass("acme", 4, "Acme", "Mastodon", &lexicon);
    assert!(approx(analyst.platform_weight, 0.9));
}

// ============================================================================
// CLASSIFY
// ============================================================================

#[tokio::test]
async fn test_attack_content_is_severe() {
    let (_, classifier) = classifier();

    let result = classifier
        .classify("Acme Corp fraud scam exposed", "Acme Corp", "twitter", None)
        .await;

    assert!(result.validated);
    assert!(approx(result.confidence, 0.7));
    let c = &result.classification;
    assert_eq!(c.category, "Reputation Attack");
    assert_eq!(c.intent, Some(Intent::Attack));
    assert_eq!(c.impact, ImpactLevel::Critical);
    assert_eq!(c.severity, 8);
    assert_eq!(c.response_tier, Some(ResponseTier::Immediate));
    assert!(approx(c.confidence, 0.586));
    assert_eq!(result.agents.analyst, "attack_threat_detected");
    assert_eq!(result.agents.validator, "partial");
    assert_eq!(result.agents.strategist, "immediate_response");
    assert_eq!(result.recommendations.len(), 4);
    assert!(c.severity <= 10);
}

#[tokio::test]
async fn test_rejected_signal_is_invalid_data() {
    let (store, classifier) = classifier();

    let result = classifier
        .classify("Unrelated chatter about the weather", "Acme Corp", "reddit", None)
        .await;

    assert!(!result.validated);
    assert_eq!(result.classification.category, "Invalid Data");
    assert_eq!(result.classification.severity, 0);
    assert_eq!(result.agents, AgentLabels::rejected());
    assert_eq!(result.recommendations, vec!["Data rejected by validation".to_string()]);

    let audit = store
        .validations()
        .query(&AuditFilter::default(), SortOrder::NewestFirst, 10)
        .await
        .unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].operation, "threat_classification");
    assert!(audit[0].outcome.is_rejection());
}
