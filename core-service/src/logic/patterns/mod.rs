//! Patterns Module - Aggregate Behaviour Detection
//!
//! Looks across a window of admitted signals (and upstream narrative
//! clusters) for sentiment shifts, coordinated bursts, viral spread,
//! platform concentration and influencer involvement.

pub mod detector;
pub mod rules;
pub mod types;
#[cfg(test)]
mod tests;

pub use detector::PatternDetector;
pub use rules::PatternThresholds;
pub use types::{DetectedPattern, PatternAnalysis, PatternImpact, PatternKind};
