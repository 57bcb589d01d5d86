//! Threat Types
//!
//! Core types for multi-agent threat classification.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

use crate::logic::validation::ValidationResult;

// ============================================================================
// INTENT / IMPACT / TIER
// ============================================================================

/// Dominant intent of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Attack,
    Concern,
    Neutral,
    Positive,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Attack => "attack",
            Intent::Concern => "concern",
            Intent::Neutral => "neutral",
            Intent::Positive => "positive",
        }
    }

    /// Human-readable threat category
    pub fn category(&self) -> &'static str {
        match self {
            Intent::Attack => "Reputation Attack",
            Intent::Concern => "Reputation Concern",
            Intent::Neutral => "Neutral Mention",
            Intent::Positive => "Positive Mention",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    /// Only for rejected signals
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::None => "none",
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        }
    }
}

/// Strategist response band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTier {
    Immediate,
    Urgent,
    Standard,
    Monitor,
}

impl ResponseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseTier::Immediate => "immediate",
            ResponseTier::Urgent => "urgent",
            ResponseTier::Standard => "standard",
            ResponseTier::Monitor => "monitor",
        }
    }

    /// Response SLA
    pub fn timeline(&self) -> &'static str {
        match self {
            ResponseTier::Immediate => "< 1 hour",
            ResponseTier::Urgent => "< 4 hours",
            ResponseTier::Standard => "< 24 hours",
            ResponseTier::Monitor => "< 72 hours",
        }
    }
}

impl std::fmt::Display for ResponseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorLabel {
    Validated,
    Partial,
    Rejected,
}

impl ValidatorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorLabel::Validated => "validated",
            ValidatorLabel::Partial => "partial",
            ValidatorLabel::Rejected => "rejected",
        }
    }
}

// ============================================================================
// AGENT OUTPUTS
// ============================================================================

/// Analyst pass: intent and estimated impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystAssessment {
    pub intent: Intent,
    pub intent_hits: usize,
    /// min(hits / 3, 1)
    pub intent_confidence: f64,
    pub estimated_impact: f64,
    /// Lexicon terms of the chosen intent found in the content
    pub key_indicators: Vec<String>,
    pub platform_weight: f64,
    pub entity_mentions: usize,
}

/// Validator pass: how much to trust the analyst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorAssessment {
    pub source_authority: f64,
    pub context_relevance: f64,
    pub threat_signature: f64,
    pub validation_confidence: f64,
    pub label: ValidatorLabel,
}

/// Strategist pass: priority and response band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategistAssessment {
    pub priority: f64,
    pub tier: ResponseTier,
    pub timeline: String,
    pub resources: Vec<String>,
    pub escalation_required: bool,
}

/// One label per agent, "rejected" across the board for invalid data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLabels {
    pub analyst: String,
    pub validator: String,
    pub strategist: String,
}

impl AgentLabels {
    pub fn rejected() -> Self {
        Self {
            analyst: "rejected".to_string(),
            validator: "rejected".to_string(),
            strategist: "rejected".to_string(),
        }
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatClassification {
    pub category: String,
    /// Always within [0, 10]
    pub severity: u8,
    /// `None` for rejected signals
    pub intent: Option<Intent>,
    pub impact: ImpactLevel,
    pub source_authority: f64,
    pub confidence: f64,
    pub priority: f64,
    pub response_tier: Option<ResponseTier>,
}

/// Full classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub classification: ThreatClassification,
    pub agents: AgentLabels,
    /// Passed the confidence validator
    pub validated: bool,
    /// Adjusted confidence from the validator (0 when rejected)
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub validation: ValidationResult,
}
