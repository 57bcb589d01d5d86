//! Validation Module - Tiered Confidence Pipeline
//!
//! Every signal passes through here before any other stage.
//!
//! # Architecture
//! - `types.rs`: `ConfidenceTier`, `ValidationResult`, audit records
//! - `rules.rs`: lexicons, boost weights, `ValidationPolicy`
//! - `validator.rs`: scoring and the audited `ConfidenceValidator`
//!
//! # Failure Strategy
//! Fail closed. A missing entity or an internal fault yields discard,
//! never an error.

pub mod rules;
pub mod types;
pub mod validator;

pub use rules::ValidationPolicy;
pub use types::{
    AuditOutcome, ConfidenceTier, ContextBoost, EntityPresence, RejectionReason,
    ValidationAuditRecord, ValidationResult, ValidationStats,
};
pub use validator::{classify_tier, entity_presence, evaluate, summarize, ConfidenceValidator};
