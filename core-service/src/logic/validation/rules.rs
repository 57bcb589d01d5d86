//! Validation Rules & Thresholds
//!
//! Lexicons and tier cutoffs for the confidence validator.
//! No validation logic here - only constants and config.

use serde::{Deserialize, Serialize};

// ============================================================================
// TIER CUTOFFS
// ============================================================================

/// At or above this = Accept
pub const ACCEPT_THRESHOLD: f64 = 0.60;

/// At or above this = Review
pub const REVIEW_THRESHOLD: f64 = 0.30;

/// At or above this = Quarantine, below = Discard
pub const QUARANTINE_THRESHOLD: f64 = 0.15;

/// Share of multi-word entity tokens that must appear
pub const ENTITY_TOKEN_RATIO: f64 = 0.7;

// ============================================================================
// BOOST WEIGHTS
// ============================================================================

pub const AUTHORITY_BOOST: f64 = 0.15;
pub const RECENCY_BOOST: f64 = 0.10;
pub const CONTEXT_DENSITY_BOOST: f64 = 0.08;
pub const ENGAGEMENT_BOOST: f64 = 0.05;

/// Context keywords needed before the density boost applies
pub const CONTEXT_KEYWORD_MIN: usize = 2;

// ============================================================================
// LEXICONS
// ============================================================================

/// Markers of non-live (test, demo, generated) content
pub const SYNTHETIC_MARKERS: &[&str] = &[
    "lorem ipsum",
    "placeholder text",
    "placeholder content",
    "test entity",
    "sample data",
    "test data",
    "mock entity",
    "mock data",
    "test user",
    "demo content",
    "synthetic data",
    "generated example",
    "simulation data",
    "fake content",
    "this is a sample",
    "example content for demonstration",
];

pub const AUTHORITY_PHRASES: &[&str] = &[
    "according to",
    "reported by",
    "confirmed by",
    "announced",
    "statement",
];

/// The current year is matched in addition to these
pub const RECENCY_PHRASES: &[&str] = &[
    "today",
    "yesterday",
    "this week",
    "recently",
    "just announced",
];

pub const CONTEXT_KEYWORDS: &[&str] = &[
    "company",
    "ceo",
    "founder",
    "business",
    "industry",
    "market",
];

pub const ENGAGEMENT_PHRASES: &[&str] = &[
    "comments",
    "shares",
    "likes",
    "viral",
    "trending",
];

// ============================================================================
// CONFIGURABLE POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub accept_min: f64,
    pub review_min: f64,
    pub quarantine_min: f64,
    pub entity_token_ratio: f64,
    pub authority_boost: f64,
    pub recency_boost: f64,
    pub context_density_boost: f64,
    pub engagement_boost: f64,
    pub context_keyword_min: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            accept_min: ACCEPT_THRESHOLD,
            review_min: REVIEW_THRESHOLD,
            quarantine_min: QUARANTINE_THRESHOLD,
            entity_token_ratio: ENTITY_TOKEN_RATIO,
            authority_boost: AUTHORITY_BOOST,
            recency_boost: RECENCY_BOOST,
            context_density_boost: CONTEXT_DENSITY_BOOST,
            engagement_boost: ENGAGEMENT_BOOST,
            context_keyword_min: CONTEXT_KEYWORD_MIN,
        }
    }
}
