//! Multi-Agent Threat Classifier
//!
//! Input: content, entity, platform, optional analyst context
//! Output: ThreatAssessment
//!
//! Three sequential heuristic passes (analyst -> validator -> strategist)
//! over content that already passed the confidence validator. All scoring
//! is deterministic; the async wrapper only adds the validation gate.

use std::sync::Arc;

use super::rules::*;
use super::types::*;
use crate::constants::CLASSIFIER_BASE_CONFIDENCE;
use crate::logic::validation::{ConfidenceValidator, ValidationResult};

pub const CLASSIFICATION_OPERATION: &str = "threat_classification";

pub struct MultiAgentClassifier {
    validator: Arc<ConfidenceValidator>,
    lexicon: ThreatLexicon,
}

impl MultiAgentClassifier {
    pub fn new(validator: Arc<ConfidenceValidator>) -> Self {
        Self {
            validator,
            lexicon: ThreatLexicon::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: ThreatLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub async fn classify(
        &self,
        content: &str,
        entity_name: &str,
        platform: &str,
        context: Option<&str>,
    ) -> ThreatAssessment {
        let validation = self
            .validator
            .validate(content, entity_name, platform, CLASSIFIER_BASE_CONFIDENCE, CLASSIFICATION_OPERATION)
            .await;

        self.classify_validated(content, entity_name, platform, context, validation)
    }

    /// Classify with a validation result obtained earlier, e.g. during
    /// batch ingestion. Non-admitted results yield "Invalid Data".
    pub fn classify_validated(
        &self,
        content: &str,
        entity_name: &str,
        platform: &str,
        context: Option<&str>,
        validation: ValidationResult,
    ) -> ThreatAssessment {
        if !validation.is_valid() {
            tracing::debug!(entity = entity_name, "classification skipped, signal rejected");
            return rejected_assessment(validation);
        }

        let (classification, agents, recommendations) =
            assess(content, entity_name, platform, context, &self.lexicon);

        tracing::info!(
            entity = entity_name,
            platform,
            category = %classification.category,
            severity = classification.severity,
            priority = classification.priority,
            "threat classified"
        );

        ThreatAssessment {
            classification,
            agents,
            validated: true,
            confidence: validation.confidence,
            recommendations,
            validation,
        }
    }
}

fn rejected_assessment(validation: ValidationResult) -> ThreatAssessment {
    ThreatAssessment {
        classification: ThreatClassification {
            category: "Invalid Data".to_string(),
            severity: 0,
            intent: None,
            impact: ImpactLevel::None,
            source_authority: 0.0,
            confidence: 0.0,
            priority: 0.0,
            response_tier: None,
        },
        agents: AgentLabels::rejected(),
        validated: false,
        confidence: 0.0,
        recommendations: vec!["Data rejected by validation".to_string()],
        validation,
    }
}

// ============================================================================
// PURE PIPELINE
// ============================================================================

/// Run the three agents and build the threat model
pub fn assess(
    content: &str,
    entity_name: &str,
    platform: &str,
    context: Option<&str>,
    lexicon: &ThreatLexicon,
) -> (ThreatClassification, AgentLabels, Vec<String>) {
    let content_lower = content.to_lowercase();

    let analyst = analyst_pass(&content_lower, content.chars().count(), entity_name, platform, lexicon);
    let validator = validator_pass(&content_lower, &analyst, context, lexicon);
    let strategist = strategist_pass(&analyst, &validator);

    let severity = severity_score(
        analyst.estimated_impact,
        validator.validation_confidence,
        strategist.priority,
    );

    let classification = ThreatClassification {
        category: analyst.intent.category().to_string(),
        severity,
        intent: Some(analyst.intent),
        impact: impact_level(analyst.estimated_impact),
        source_authority: validator.source_authority,
        confidence: validator.validation_confidence,
        priority: strategist.priority,
        response_tier: Some(strategist.tier),
    };

    let agents = AgentLabels {
        analyst: format!("{}_threat_detected", analyst.intent.as_str()),
        validator: validator.label.as_str().to_string(),
        strategist: format!("{}_response", strategist.tier.as_str()),
    };

    let recs = recommendations(severity, strategist.escalation_required);
    (classification, agents, recs)
}

pub fn analyst_pass(
    content_lower: &str,
    content_chars: usize,
    entity_name: &str,
    platform: &str,
    lexicon: &ThreatLexicon,
) -> AnalystAssessment {
    let mut intent = Intent::Neutral;
    let mut best_hits = 0usize;
    let mut indicators: Vec<String> = Vec::new();

    for (candidate, keywords) in &lexicon.intent_keywords {
        let found: Vec<String> = keywords
            .iter()
            .filter(|k| content_lower.contains(k.as_str()))
            .cloned()
            .collect();
        if found.len() > best_hits {
            intent = *candidate;
            best_hits = found.len();
            indicators = found;
        }
    }

    let entity_lower = entity_name.trim().to_lowercase();
    let entity_mentions = if entity_lower.is_empty() {
        0
    } else {
        content_lower.matches(entity_lower.as_str()).count()
    };

    let platform_weight = lexicon.platform_weight(platform);
    let long_bonus = if content_chars > LONG_CONTENT_CHARS { 0.1 } else { 0.0 };
    let estimated_impact =
        (0.4 * best_hits as f64 + 0.3 * platform_weight + 0.2 * entity_mentions as f64 + long_bonus).clamp(0.0, 1.0);

    AnalystAssessment {
        intent,
        intent_hits: best_hits,
        intent_confidence: (best_hits as f64 / INTENT_SATURATION).min(1.0),
        estimated_impact,
        key_indicators: indicators,
        platform_weight,
        entity_mentions,
    }
}

pub fn validator_pass(
    content_lower: &str,
    analyst: &AnalystAssessment,
    context: Option<&str>,
    lexicon: &ThreatLexicon,
) -> ValidatorAssessment {
    let authority_hits = lexicon
        .authority_phrases
        .iter()
        .filter(|p| content_lower.contains(p.as_str()))
        .count();
    let source_authority = (0.2 * authority_hits as f64 + 0.8 * analyst.platform_weight).min(1.0);

    let context_relevance = context
        .map(|c| context_relevance(content_lower, c))
        .unwrap_or(NEUTRAL_CONTEXT_RELEVANCE);

    let signature_hits = lexicon
        .threat_signatures
        .iter()
        .filter(|s| content_lower.contains(s.as_str()))
        .count();
    let threat_signature = (signature_hits as f64 / SIGNATURE_SATURATION).min(1.0);

    let validation_confidence = (0.4 * source_authority + 0.3 * context_relevance + 0.3 * threat_signature).clamp(0.0, 1.0);

    let label = if validation_confidence > VALIDATED_MIN {
        ValidatorLabel::Validated
    } else if validation_confidence > PARTIAL_MIN {
        ValidatorLabel::Partial
    } else {
        ValidatorLabel::Rejected
    };

    ValidatorAssessment {
        source_authority,
        context_relevance,
        threat_signature,
        validation_confidence,
        label,
    }
}

/// Share of context tokens present in the content. Blank context counts
/// as no context.
pub fn context_relevance(content_lower: &str, context: &str) -> f64 {
    let context_lower = context.to_lowercase();
    let words: Vec<&str> = context_lower.split_whitespace().collect();
    if words.is_empty() {
        return NEUTRAL_CONTEXT_RELEVANCE;
    }
    let hits = words.iter().filter(|w| content_lower.contains(*w)).count();
    (hits as f64 / words.len() as f64).min(1.0)
}

pub fn strategist_pass(analyst: &AnalystAssessment, validator: &ValidatorAssessment) -> StrategistAssessment {
    let priority = (0.5 * analyst.estimated_impact
        + 0.3 * validator.validation_confidence
        + 0.2 * analyst.intent_confidence)
        .clamp(0.0, 1.0);

    let tier = if priority >= IMMEDIATE_MIN {
        ResponseTier::Immediate
    } else if priority >= URGENT_MIN {
        ResponseTier::Urgent
    } else if priority >= STANDARD_MIN {
        ResponseTier::Standard
    } else {
        ResponseTier::Monitor
    };

    let mut resources = vec!["monitoring".to_string(), "documentation".to_string()];
    if priority >= IMMEDIATE_MIN {
        resources.extend(["legal_team", "pr_team", "executive_notification"].map(String::from));
    } else if priority >= URGENT_MIN {
        resources.extend(["content_team", "social_media_team"].map(String::from));
    }

    StrategistAssessment {
        priority,
        tier,
        timeline: tier.timeline().to_string(),
        resources,
        escalation_required: priority >= ESCALATION_MIN,
    }
}

/// round(10 * weighted sum), clamped to [0, 10]
pub fn severity_score(impact: f64, validation_confidence: f64, priority: f64) -> u8 {
    let raw = 10.0 * (0.4 * impact + 0.3 * validation_confidence + 0.3 * priority);
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_SEVERITY as f64) as u8
}

pub fn impact_level(impact: f64) -> ImpactLevel {
    if impact >= CRITICAL_IMPACT_MIN {
        ImpactLevel::Critical
    } else if impact >= HIGH_IMPACT_MIN {
        ImpactLevel::High
    } else if impact >= MEDIUM_IMPACT_MIN {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

pub fn recommendations(severity: u8, escalation_required: bool) -> Vec<String> {
    let mut recs: Vec<&str> = if severity >= SEVERITY_ESCALATE_MIN {
        vec!["Immediate escalation required", "Legal review recommended", "Stakeholder notification"]
    } else if severity >= SEVERITY_ENHANCED_MIN {
        vec!["Enhanced monitoring", "Prepare counter-narrative", "Track source development"]
    } else {
        vec!["Standard monitoring", "Document for patterns"]
    };

    if escalation_required {
        recs.push("Executive team notification");
    }
    recs.into_iter().map(String::from).collect()
}
