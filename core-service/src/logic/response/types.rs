//! Response Types
//!
//! Execution policy and the per-strategy execution result.
//! No logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ACTION_TIMEOUT_MS;
use crate::logic::strategy::{ExecutionRecord, StrategyStatus};

// ============================================================================
// EXECUTION POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionPolicy {
    /// Upper bound on a single dispatch
    pub action_timeout_ms: u64,
    /// Dispatch a strategy's actions concurrently instead of in order
    pub concurrent_actions: bool,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            action_timeout_ms: DEFAULT_ACTION_TIMEOUT_MS,
            concurrent_actions: false,
        }
    }
}

// ============================================================================
// EXECUTION RESULT
// ============================================================================

/// Returned by `StrategyExecutor::execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyExecutionResult {
    pub strategy_id: String,
    /// Always terminal (completed, partial or cancelled)
    pub status: StrategyStatus,
    pub execution: ExecutionRecord,
}

impl StrategyExecutionResult {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.execution.started_at
    }

    pub fn has_failures(&self) -> bool {
        self.execution.failed_actions > 0 || self.execution.fault.is_some()
    }
}
