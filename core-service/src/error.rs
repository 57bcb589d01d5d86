//! Error taxonomy
//!
//! Unit-of-work failures (a rejected signal, one failed action, a partially
//! executed plan) are data, not errors. Only precondition violations and
//! collaborator faults surface through these types.

use thiserror::Error;

use crate::storage::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors propagated to callers of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing strategy or plan
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Operation attempted on an entity in the wrong state.
    /// Retryable after the caller inspects the current state.
    #[error("{kind} '{id}' is {actual}, expected {expected}")]
    StateConflict {
        kind: &'static str,
        id: String,
        expected: String,
        actual: String,
    },

    /// Persistence collaborator failure
    #[error("storage error: {0}")]
    Store(#[source] StoreError),

    /// Invalid engine configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn strategy_not_found(id: &str) -> Self {
        EngineError::NotFound { kind: "strategy", id: id.to_string() }
    }

    pub fn plan_not_found(id: &str) -> Self {
        EngineError::NotFound { kind: "plan", id: id.to_string() }
    }

    /// A state conflict means "already in progress" for the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StateConflict { .. })
    }
}

/// Precondition failures reported by the store keep their meaning
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => EngineError::NotFound { kind, id },
            StoreError::Conflict { kind, id, expected, actual } => EngineError::StateConflict {
                kind,
                id,
                expected,
                actual,
            },
            other => EngineError::Store(other),
        }
    }
}

/// Internal validator fault. Never escapes `validate()`; it is
/// downgraded to a discard result and audited.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("base confidence is not a finite number")]
    NonFiniteConfidence,

    #[error("entity name is empty")]
    EmptyEntity,
}

/// Failure of a single dispatched action. Contained by the executor
/// and recorded in the strategy's execution record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("action timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("handler failed: {0}")]
    Handler(String),

    #[error("no handler registered for '{0}'")]
    Unsupported(String),
}
