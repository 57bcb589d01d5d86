//! Coordination Types
//!
//! Multi-strategy plans and their execution results.
//! No logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::strategy::{StrategyPriority, StrategyStatus, StrategyType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Pending,
    Executing,
    Completed,
    Failed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Executing => "executing",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Failed)
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One strategy in the plan's chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub strategy_id: String,
    pub strategy_type: StrategyType,
    pub priority: StrategyPriority,
    /// 1-based
    pub execution_order: usize,
    /// Immediate predecessor; `None` only for the first step
    pub depends_on: Option<String>,
    pub platforms: Vec<String>,
    pub action_count: usize,
}

/// Edge of the dependency chain: `strategy_id` waits for `depends_on`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDependency {
    pub strategy_id: String,
    pub depends_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationPlan {
    pub id: String,
    pub entity_name: String,
    pub plan_name: String,
    pub steps: Vec<PlanStep>,
    pub platforms: Vec<String>,
    pub dependencies: Vec<StepDependency>,
    pub timeline_hours: u32,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<CoordinationResult>,
}

/// How one step ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub strategy_id: String,
    pub execution_order: usize,
    /// Terminal strategy status, `None` when the step never ran
    pub status: Option<StrategyStatus>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationResult {
    pub plan_id: String,
    pub status: PlanStatus,
    /// Completed or partial strategies
    pub executed: Vec<String>,
    /// Subset of `executed` with at least one failed action
    pub partial: Vec<String>,
    /// Cancelled, errored or skipped strategies
    pub failed: Vec<String>,
    pub steps: Vec<StepResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl CoordinationResult {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Read-only view for the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStatusReport {
    pub plan_id: String,
    pub status: PlanStatus,
    pub total_steps: usize,
    pub executed: usize,
    pub failed: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationMetrics {
    pub overall_reach: f64,
    pub platform_synergy: f64,
    pub message_consistency: f64,
    pub resource_efficiency: f64,
}
