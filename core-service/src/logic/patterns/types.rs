//! Pattern Types
//!
//! Aggregate behavioural signatures detected across a signal window.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// PATTERN KIND
// ============================================================================

/// The five aggregate detectors, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    SentimentShift,
    CoordinatedAttack,
    ViralRisk,
    PlatformMigration,
    InfluencerInvolvement,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::SentimentShift => "sentiment_shift",
            PatternKind::CoordinatedAttack => "coordinated_attack",
            PatternKind::ViralRisk => "viral_risk",
            PatternKind::PlatformMigration => "platform_migration",
            PatternKind::InfluencerInvolvement => "influencer_involvement",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// IMPACT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternImpact {
    Low,
    Medium,
    High,
}

impl PatternImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternImpact::Low => "low",
            PatternImpact::Medium => "medium",
            PatternImpact::High => "high",
        }
    }
}

// ============================================================================
// DETECTED PATTERN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub description: String,
    pub confidence: f64,
    /// Human-readable window the pattern spans ("1 hour", "7 days", ...)
    pub timeframe: String,
    pub impact: PatternImpact,
    /// Platforms involved, sorted and deduplicated
    pub sources: Vec<String>,
}

/// `detect` output enriched with analyst-facing text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub patterns: Vec<DetectedPattern>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// 0.9 with no pattern, else mean pattern confidence (2 dp)
    pub confidence: f64,
}
