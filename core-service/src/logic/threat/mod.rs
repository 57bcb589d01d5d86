//! Threat Module
//!
//! Multi-agent classification of validated signals into a threat model
//! (category, severity, intent, impact, response tier).
//!
//! ## Structure
//! - `types`: agent outputs and the final classification
//! - `rules`: lexicons, platform weights, cutoffs
//! - `classifier`: the analyst / validator / strategist pipeline

pub mod classifier;
pub mod rules;
pub mod types;

#[cfg(test)]
mod tests;

pub use classifier::{assess, severity_score, MultiAgentClassifier};
pub use rules::ThreatLexicon;
pub use types::*;
