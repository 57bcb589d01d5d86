//! Threat Classification Rules & Lexicons
//!
//! Keyword tables, platform weights and cutoffs for the three agents.
//! No classification logic here - only constants and config.

use std::collections::HashMap;

use super::types::Intent;

// ============================================================================
// ANALYST
// ============================================================================

/// Checked in this order; ties keep the earlier intent
pub const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Attack,
        &["defame", "expose", "scam", "fraud", "fake", "lie", "corrupt", "illegal"],
    ),
    (
        Intent::Concern,
        &["worried", "concerned", "questionable", "suspicious", "doubt"],
    ),
    (Intent::Neutral, &["mention", "discuss", "reference", "about"]),
    (Intent::Positive, &["excellent", "great", "recommend", "trust", "quality"]),
];

pub const PLATFORM_WEIGHTS: &[(&str, f64)] = &[
    ("reddit", 0.7),
    ("twitter", 0.8),
    ("facebook", 0.6),
    ("linkedin", 0.9),
    ("youtube", 0.7),
    ("instagram", 0.5),
    ("tiktok", 0.6),
    ("news", 0.9),
    ("blog", 0.6),
];

pub const DEFAULT_PLATFORM_WEIGHT: f64 = 0.5;

/// Intent hits at which intent confidence saturates
pub const INTENT_SATURATION: f64 = 3.0;

/// Content longer than this adds to impact
pub const LONG_CONTENT_CHARS: usize = 200;

// ============================================================================
// VALIDATOR
// ============================================================================

pub const SOURCE_AUTHORITY_PHRASES: &[&str] = &["verified", "official", "confirmed", "reported by"];

pub const THREAT_SIGNATURES: &[&str] = &[
    "leaked",
    "exposed",
    "scandal",
    "investigation",
    "lawsuit",
    "fraud",
    "scam",
    "criminal",
    "illegal",
    "corruption",
];

/// Signature hits at which the signature score saturates
pub const SIGNATURE_SATURATION: f64 = 5.0;

/// Context relevance when no context is supplied
pub const NEUTRAL_CONTEXT_RELEVANCE: f64 = 0.5;

pub const VALIDATED_MIN: f64 = 0.6;
pub const PARTIAL_MIN: f64 = 0.3;

// ============================================================================
// STRATEGIST / SEVERITY
// ============================================================================

pub const IMMEDIATE_MIN: f64 = 0.8;
pub const URGENT_MIN: f64 = 0.6;
pub const STANDARD_MIN: f64 = 0.4;

/// Priority at or above which escalation is required
pub const ESCALATION_MIN: f64 = 0.8;

pub const CRITICAL_IMPACT_MIN: f64 = 0.8;
pub const HIGH_IMPACT_MIN: f64 = 0.6;
pub const MEDIUM_IMPACT_MIN: f64 = 0.4;

pub const SEVERITY_ESCALATE_MIN: u8 = 8;
pub const SEVERITY_ENHANCED_MIN: u8 = 5;
pub const MAX_SEVERITY: u8 = 10;

// ============================================================================
// SWAPPABLE LEXICON
// ============================================================================

/// Every keyword table the classifier reads. `Default` is the built-in set.
#[derive(Debug, Clone)]
pub struct ThreatLexicon {
    pub intent_keywords: Vec<(Intent, Vec<String>)>,
    pub platform_weights: HashMap<String, f64>,
    pub authority_phrases: Vec<String>,
    pub threat_signatures: Vec<String>,
}

impl ThreatLexicon {
    /// Case-insensitive, default 0.5
    pub fn platform_weight(&self, platform: &str) -> f64 {
        self.platform_weights
            .get(&platform.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_PLATFORM_WEIGHT)
    }
}

impl Default for ThreatLexicon {
    fn default() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            intent_keywords: INTENT_KEYWORDS.iter().map(|(i, terms)| (*i, owned(terms))).collect(),
            platform_weights: PLATFORM_WEIGHTS.iter().map(|(p, w)| (p.to_string(), *w)).collect(),
            authority_phrases: owned(SOURCE_AUTHORITY_PHRASES),
            threat_signatures: owned(THREAT_SIGNATURES),
        }
    }
}
