//! Logic Module - Engine Components
//!
//! Chứa các thành phần xử lý: Validation, Threat, Patterns, Strategy,
//! Response, Coordination.
//!
//! ## Architecture
//! - `validation/` - Confidence tiers and audit trail
//! - `threat/` - Multi-agent threat classification
//! - `patterns/` - Pattern detection over signal windows
//! - `strategy/` - Recommend, generate, predict, optimize
//! - `response/` - Strategy execution and action dispatch
//! - `coordination/` - Cross-platform plans

pub mod signal;

pub mod validation;
pub mod threat;
pub mod patterns;
pub mod strategy;
pub mod response;
pub mod coordination;
