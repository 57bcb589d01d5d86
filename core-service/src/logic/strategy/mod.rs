//! Strategy Module - Recommend, Generate, Predict, Optimize
//!
//! # Architecture
//! - `types.rs`: strategies, actions, execution records, advisory records
//! - `rules.rs`: coefficients and lookup tables
//! - `features.rs`: recommender feature vector
//! - `similarity.rs`: cosine nearest-neighbour over learned patterns
//! - `recommender.rs`, `generator.rs`, `predictor.rs`, `optimizer.rs`
//!
//! Only the executor mutates a strategy's status; everything here either
//! creates new rows or reads history.

pub mod features;
pub mod generator;
pub mod optimizer;
pub mod predictor;
pub mod recommender;
pub mod rules;
pub mod similarity;
pub mod types;

#[cfg(test)]
mod tests;

pub use rules::RecommenderPolicy;
pub use types::*;

pub use features::extract_features;
pub use generator::{build_strategies, StrategyGenerator};
pub use optimizer::{optimize_with_history, StrategyOptimizer};
pub use predictor::{predict, OutcomePredictor};
pub use recommender::StrategyRecommender;
pub use similarity::{best_match, cosine_similarity, PatternMatch};
