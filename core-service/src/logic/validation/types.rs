//! Validation Types
//!
//! Core types for signal validation.
//! No logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIDENCE TIER
// ============================================================================

/// Tiered confidence classification of a single signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Trusted, flows through the pipeline
    Accept,
    /// Flows through, flagged for analyst review
    Review,
    /// Flows through, held for closer inspection
    Quarantine,
    /// Dropped before classification
    Discard,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Accept => "accept",
            ConfidenceTier::Review => "review",
            ConfidenceTier::Quarantine => "quarantine",
            ConfidenceTier::Discard => "discard",
        }
    }

    /// Anything but discard reaches classification and pattern stages
    pub fn is_admitted(&self) -> bool {
        !matches!(self, ConfidenceTier::Discard)
    }

    pub fn requires_review(&self) -> bool {
        matches!(self, ConfidenceTier::Review | ConfidenceTier::Quarantine)
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONTEXT BOOSTS
// ============================================================================

/// Linguistic cue that adds to the base confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextBoost {
    HighAuthoritySource,
    RecentTimestamp,
    EntityContextRich,
    SocialEngagementHigh,
}

impl ContextBoost {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextBoost::HighAuthoritySource => "high_authority_source",
            ContextBoost::RecentTimestamp => "recent_timestamp",
            ContextBoost::EntityContextRich => "entity_context_rich",
            ContextBoost::SocialEngagementHigh => "social_engagement_high",
        }
    }
}

// ============================================================================
// REJECTION
// ============================================================================

/// Why a signal was rejected outright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Matched the non-live content lexicon
    SyntheticContent,
    /// Entity name (or enough of its tokens) absent
    EntityNotFound,
    /// Internal validator fault, downgraded to discard
    ValidationError,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::SyntheticContent => "synthetic_content",
            RejectionReason::EntityNotFound => "entity_not_found",
            RejectionReason::ValidationError => "validation_error",
        }
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub tier: ConfidenceTier,
    /// Adjusted confidence, always within [0, 1]
    pub confidence: f64,
    pub boosts: Vec<ContextBoost>,
    pub rejection_reason: Option<RejectionReason>,
    pub rejection_detail: Option<String>,
}

impl ValidationResult {
    pub fn rejected(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Self {
            tier: ConfidenceTier::Discard,
            confidence: 0.0,
            boosts: Vec::new(),
            rejection_reason: Some(reason),
            rejection_detail: Some(detail.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.tier.is_admitted()
    }
}

/// Entity presence check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPresence {
    pub is_present: bool,
    pub occurrences: usize,
}

// ============================================================================
// AUDIT RECORD
// ============================================================================

/// Immutable audit row written for every validation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationAuditRecord {
    pub id: String,
    pub entity_name: String,
    pub platform: String,
    pub operation: String,
    pub outcome: AuditOutcome,
    pub content_preview: String,
    pub content_length: usize,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditOutcome {
    Validated {
        tier: ConfidenceTier,
        confidence: f64,
        boosts: Vec<ContextBoost>,
    },
    Rejected {
        reason: RejectionReason,
        details: Option<String>,
    },
}

impl AuditOutcome {
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuditOutcome::Rejected { .. })
    }
}

/// Aggregate counters over a time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_validations: usize,
    pub accepted_count: usize,
    pub review_count: usize,
    pub quarantined_count: usize,
    pub discarded_count: usize,
    pub avg_confidence: f64,
}
