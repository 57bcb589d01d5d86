//! Confidence Validator
//!
//! Input: raw content, entity name, platform, base confidence
//! Output: ValidationResult (tier + adjusted confidence)
//!
//! The pure scoring lives in `evaluate`; `ConfidenceValidator` wraps it
//! with the audit trail and the "never halt the pipeline" guarantee.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use super::rules::*;
use super::types::*;
use crate::constants::CONTENT_PREVIEW_CHARS;
use crate::error::ValidationError;
use crate::storage::{AuditFilter, Persistence, SortOrder};

// ============================================================================
// PURE SCORING
// ============================================================================

/// Score one piece of content. Rule rejections come back as `Ok` discard
/// results; only internal faults are `Err`.
pub fn evaluate(
    content: &str,
    entity_name: &str,
    base_confidence: f64,
    policy: &ValidationPolicy,
    now: DateTime<Utc>,
) -> Result<ValidationResult, ValidationError> {
    if entity_name.trim().is_empty() {
        return Err(ValidationError::EmptyEntity);
    }
    if !base_confidence.is_finite() {
        return Err(ValidationError::NonFiniteConfidence);
    }

    let content_lower = content.to_lowercase();

    // Step 1: synthetic-data guard
    let markers = synthetic_markers(&content_lower);
    if !markers.is_empty() {
        return Ok(ValidationResult::rejected(
            RejectionReason::SyntheticContent,
            format!("Non-live content markers: {}", markers.join(", ")),
        ));
    }

    // Step 2: entity presence (hard gate, fail closed)
    if !entity_presence(&content_lower, entity_name, policy.entity_token_ratio).is_present {
        return Ok(ValidationResult::rejected(
            RejectionReason::EntityNotFound,
            format!("Entity \"{}\" not found in content", entity_name),
        ));
    }

    // Step 3-4: context boosts, additive then clamped
    let boosts = context_boosts(&content_lower, policy, now);
    let boost_total: f64 = boosts.iter().map(|b| boost_weight(*b, policy)).sum();
    let confidence = (base_confidence + boost_total).clamp(0.0, 1.0);

    Ok(ValidationResult {
        tier: classify_tier(confidence, policy),
        confidence,
        boosts,
        rejection_reason: None,
        rejection_detail: None,
    })
}

/// Entries of the non-live lexicon found in (lowercased) content
pub fn synthetic_markers(content_lower: &str) -> Vec<&'static str> {
    SYNTHETIC_MARKERS
        .iter()
        .copied()
        .filter(|m| content_lower.contains(m))
        .collect()
}

/// Direct mention, or enough tokens of a multi-word name
pub fn entity_presence(content_lower: &str, entity_name: &str, token_ratio: f64) -> EntityPresence {
    let entity_lower = entity_name.trim().to_lowercase();
    let direct = if entity_lower.is_empty() {
        0
    } else {
        content_lower.matches(entity_lower.as_str()).count()
    };

    let tokens: Vec<&str> = entity_lower
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect();
    let partial = tokens.iter().filter(|t| content_lower.contains(*t)).count();

    // 1e-9 keeps e.g. 10 * 0.7 from rounding up to 8
    let required = (tokens.len() as f64 * token_ratio - 1e-9).ceil() as usize;
    let is_present = direct >= 1 || (tokens.len() > 1 && partial >= required.max(1));

    EntityPresence {
        is_present,
        occurrences: direct + partial,
    }
}

/// Each cue is detected independently
pub fn context_boosts(content_lower: &str, policy: &ValidationPolicy, now: DateTime<Utc>) -> Vec<ContextBoost> {
    let mut boosts = Vec::new();

    if AUTHORITY_PHRASES.iter().any(|p| content_lower.contains(p)) {
        boosts.push(ContextBoost::HighAuthoritySource);
    }

    let year = now.year().to_string();
    if RECENCY_PHRASES.iter().any(|p| content_lower.contains(p)) || content_lower.contains(&year) {
        boosts.push(ContextBoost::RecentTimestamp);
    }

    let context_hits = CONTEXT_KEYWORDS.iter().filter(|k| content_lower.contains(*k)).count();
    if context_hits >= policy.context_keyword_min {
        boosts.push(ContextBoost::EntityContextRich);
    }

    if ENGAGEMENT_PHRASES.iter().any(|p| content_lower.contains(p)) {
        boosts.push(ContextBoost::SocialEngagementHigh);
    }

    boosts
}

pub fn boost_weight(boost: ContextBoost, policy: &ValidationPolicy) -> f64 {
    match boost {
        ContextBoost::HighAuthoritySource => policy.authority_boost,
        ContextBoost::RecentTimestamp => policy.recency_boost,
        ContextBoost::EntityContextRich => policy.context_density_boost,
        ContextBoost::SocialEngagementHigh => policy.engagement_boost,
    }
}

/// Inclusive lower bounds
pub fn classify_tier(confidence: f64, policy: &ValidationPolicy) -> ConfidenceTier {
    if confidence >= policy.accept_min {
        ConfidenceTier::Accept
    } else if confidence >= policy.review_min {
        ConfidenceTier::Review
    } else if confidence >= policy.quarantine_min {
        ConfidenceTier::Quarantine
    } else {
        ConfidenceTier::Discard
    }
}

// ============================================================================
// VALIDATOR (audited)
// ============================================================================

pub struct ConfidenceValidator {
    policy: ValidationPolicy,
    store: Arc<dyn Persistence>,
}

impl ConfidenceValidator {
    pub fn new(policy: ValidationPolicy, store: Arc<dyn Persistence>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate one signal. Never fails: internal faults become a discard
    /// result, audit failures are logged.
    pub async fn validate(
        &self,
        content: &str,
        entity_name: &str,
        platform: &str,
        base_confidence: f64,
        operation: &str,
    ) -> ValidationResult {
        tracing::debug!(entity = entity_name, operation, "validating signal");

        let result = match evaluate(content, entity_name, base_confidence, &self.policy, Utc::now()) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(entity = entity_name, error = %e, "validator fault, discarding signal");
                ValidationResult::rejected(RejectionReason::ValidationError, format!("Validation error: {}", e))
            }
        };

        let outcome = match result.rejection_reason {
            Some(reason) => {
                tracing::warn!(entity = entity_name, reason = reason.as_str(), "signal rejected");
                AuditOutcome::Rejected {
                    reason,
                    details: result.rejection_detail.clone(),
                }
            }
            None => AuditOutcome::Validated {
                tier: result.tier,
                confidence: result.confidence,
                boosts: result.boosts.clone(),
            },
        };

        let record = ValidationAuditRecord {
            id: Uuid::new_v4().to_string(),
            entity_name: entity_name.to_string(),
            platform: platform.to_string(),
            operation: operation.to_string(),
            outcome,
            content_preview: content.chars().take(CONTENT_PREVIEW_CHARS).collect(),
            content_length: content.len(),
            recorded_at: Utc::now(),
        };

        if let Err(e) = self.store.validations().append(record).await {
            tracing::error!(entity = entity_name, error = %e, "failed to write validation audit record");
        }

        result
    }

    /// Counters over every audit record since `since`
    pub async fn stats_since(&self, since: DateTime<Utc>) -> ValidationStats {
        let filter = AuditFilter {
            since: Some(since),
            ..Default::default()
        };
        match self.store.validations().query(&filter, SortOrder::OldestFirst, usize::MAX).await {
            Ok(records) => summarize(&records),
            Err(e) => {
                tracing::error!(error = %e, "failed to load validation stats");
                ValidationStats::default()
            }
        }
    }
}

/// Fold audit records into counters
pub fn summarize(records: &[ValidationAuditRecord]) -> ValidationStats {
    let mut stats = ValidationStats {
        total_validations: records.len(),
        ..Default::default()
    };

    let mut confidence_sum = 0.0;
    let mut scored = 0usize;

    for record in records {
        match &record.outcome {
            AuditOutcome::Rejected { .. } => stats.discarded_count += 1,
            AuditOutcome::Validated { tier, confidence, .. } => {
                confidence_sum += confidence;
                scored += 1;
                match tier {
                    ConfidenceTier::Accept => stats.accepted_count += 1,
                    ConfidenceTier::Review => stats.review_count += 1,
                    ConfidenceTier::Quarantine => stats.quarantined_count += 1,
                    ConfidenceTier::Discard => stats.discarded_count += 1,
                }
            }
        }
    }

    if scored > 0 {
        stats.avg_confidence = confidence_sum / scored as f64;
    }
    stats
}
