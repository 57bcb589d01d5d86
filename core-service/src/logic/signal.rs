//! Signal Types
//!
//! Inputs supplied by the ingestion collaborator.
//! No logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed content unit about a monitored entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub text: String,
    pub platform: String,
    pub entity_name: String,
    pub timestamp: DateTime<Utc>,
    /// Sentiment in [-1, 1] when the collector provides one
    #[serde(default)]
    pub sentiment: Option<f64>,
    /// Estimated audience reached
    #[serde(default)]
    pub reach: Option<f64>,
}

impl Signal {
    pub fn new(id: &str, text: &str, platform: &str, entity_name: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            platform: platform.to_string(),
            entity_name: entity_name.to_string(),
            timestamp,
            sentiment: None,
            reach: None,
        }
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_reach(mut self, reach: f64) -> Self {
        self.reach = Some(reach);
        self
    }
}

/// Narrative cluster summary produced upstream of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRecord {
    pub id: String,
    pub entity_name: String,
    #[serde(default)]
    pub influence_score: Option<f64>,
    #[serde(default)]
    pub source_platform: Option<String>,
    pub created_at: DateTime<Utc>,
}
