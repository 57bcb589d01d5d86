//! Coordination Module - Multi-Strategy Plans
//!
//! # Architecture
//! - `types.rs`: plans, steps, results
//! - `rules.rs`: timeframe constants, platform tables, failure policy
//! - `planner.rs`: `Coordinator` (create / execute / inspect plans)
//! - `metrics.rs`: reach, synergy, consistency, efficiency

pub mod metrics;
pub mod planner;
pub mod rules;
pub mod types;


pub use rules::CoordinationPolicy;
pub use types::*;

pub use metrics::compute_metrics;
pub use planner::{build_plan, parse_timeframe_hours, Coordinator};
