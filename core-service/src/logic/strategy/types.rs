//! Strategy Types
//!
//! Response strategies, their actions and execution records, plus the
//! advisory records produced around them (recommendations, predictions,
//! learned patterns, optimization results).
//! No logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::patterns::PatternKind;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Defensive,
    Proactive,
    CounterNarrative,
    Legal,
    Engagement,
}

impl StrategyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Defensive => "defensive",
            StrategyType::Proactive => "proactive",
            StrategyType::CounterNarrative => "counter_narrative",
            StrategyType::Legal => "legal",
            StrategyType::Engagement => "engagement",
        }
    }
}

impl std::fmt::Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered low < medium < high < critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl StrategyPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyPriority::Low => "low",
            StrategyPriority::Medium => "medium",
            StrategyPriority::High => "high",
            StrategyPriority::Critical => "critical",
        }
    }

    /// One level up, saturating at critical
    pub fn bumped(&self) -> Self {
        match self {
            StrategyPriority::Low => StrategyPriority::Medium,
            StrategyPriority::Medium => StrategyPriority::High,
            StrategyPriority::High | StrategyPriority::Critical => StrategyPriority::Critical,
        }
    }
}

impl std::fmt::Display for StrategyPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Pending,
    Executing,
    Completed,
    Partial,
    Cancelled,
}

impl StrategyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyStatus::Pending => "pending",
            StrategyStatus::Executing => "executing",
            StrategyStatus::Completed => "completed",
            StrategyStatus::Partial => "partial",
            StrategyStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StrategyStatus::Completed | StrategyStatus::Partial | StrategyStatus::Cancelled
        )
    }
}

impl std::fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dispatch capability, fixed when the action is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ContentDeploy,
    FileReport,
    ActivateInfluencers,
    Monitor,
    Generic,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ContentDeploy => "content_deploy",
            ActionKind::FileReport => "file_report",
            ActionKind::ActivateInfluencers => "activate_influencers",
            ActionKind::Monitor => "monitor",
            ActionKind::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// STRATEGY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAction {
    pub kind: ActionKind,
    pub description: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub timeline: String,
    pub responsible: String,
    pub kpi: String,
}

impl StrategyAction {
    pub fn new(kind: ActionKind, description: &str, timeline: &str, responsible: &str, kpi: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            platforms: Vec::new(),
            timeline: timeline.to_string(),
            responsible: responsible.to_string(),
            kpi: kpi.to_string(),
        }
    }

    pub fn on_platforms(mut self, platforms: &[String]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }
}

/// Outcome of one dispatched action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub index: usize,
    pub kind: ActionKind,
    pub description: String,
    pub success: bool,
    /// Handler payload on success
    pub detail: Option<String>,
    /// Failure cause (handler error or timeout)
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Written once by the executor when a strategy reaches a terminal status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub executed_actions: usize,
    pub failed_actions: usize,
    pub outcomes: Vec<ActionOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Top-level fault that cancelled the run, if any
    #[serde(default)]
    pub fault: Option<String>,
}

impl ExecutionRecord {
    /// The success rule shared by recommender, predictor and optimizer
    pub fn is_success(&self) -> bool {
        self.executed_actions > self.failed_actions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStrategy {
    pub id: String,
    pub entity_name: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub title: String,
    pub description: String,
    pub actions: Vec<StrategyAction>,
    pub priority: StrategyPriority,
    pub timeframe: String,
    pub resources: Vec<String>,
    pub status: StrategyStatus,
    /// Pattern the strategy was generated for (`None` for baseline)
    #[serde(default)]
    pub source_pattern: Option<PatternKind>,
    /// Set on optimizer-derived copies
    #[serde(default)]
    pub derived_from: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub execution: Option<ExecutionRecord>,
}

impl ResponseStrategy {
    /// Every platform named by any action, sorted and deduplicated
    pub fn platforms(&self) -> Vec<String> {
        let mut platforms: Vec<String> = self.actions.iter().flat_map(|a| a.platforms.iter().cloned()).collect();
        platforms.sort();
        platforms.dedup();
        platforms
    }

    /// Wall-clock hours from creation to completion, when completed
    pub fn completion_hours(&self) -> Option<f64> {
        if self.status != StrategyStatus::Completed {
            return None;
        }
        let end = self
            .execution
            .as_ref()
            .map(|e| e.completed_at)
            .or(self.completed_at)?;
        Some((end - self.created_at).num_milliseconds() as f64 / 3_600_000.0)
    }
}

// ============================================================================
// RECOMMENDATION / LEARNING
// ============================================================================

/// Prior executed strategy as seen by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub strategy_type: StrategyType,
    pub occurred_at: DateTime<Utc>,
    pub platforms: Vec<String>,
    pub executed_actions: usize,
    pub failed_actions: usize,
}

impl HistoricalEvent {
    /// Only strategies that carry an execution record feed back
    pub fn from_strategy(strategy: &ResponseStrategy) -> Option<Self> {
        let execution = strategy.execution.as_ref()?;
        Some(Self {
            strategy_type: strategy.strategy_type,
            occurred_at: strategy.created_at,
            platforms: strategy.platforms(),
            executed_actions: execution.executed_actions,
            failed_actions: execution.failed_actions,
        })
    }

    pub fn is_success(&self) -> bool {
        self.executed_actions > self.failed_actions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub strategy_type: StrategyType,
    pub confidence: f64,
    pub reasoning: String,
    pub expected_outcome: f64,
    pub risk_factors: Vec<String>,
}

/// Feature vector and outcome persisted after every recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedPattern {
    pub id: String,
    pub entity_name: String,
    pub features: Vec<f64>,
    pub success_rate: f64,
    pub optimal_strategy: StrategyType,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// PREDICTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedOutcome {
    Success,
    Partial,
    Failure,
}

impl PredictedOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictedOutcome::Success => "success",
            PredictedOutcome::Partial => "partial",
            PredictedOutcome::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    pub success_probability: f64,
    /// Hours
    pub time_to_complete: f64,
    pub resource_requirement: f64,
    pub risk_level: f64,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPrediction {
    pub strategy_id: String,
    pub entity_name: String,
    pub predicted_outcome: PredictedOutcome,
    pub metrics: PredictionMetrics,
    pub recommendations: Vec<String>,
    pub alternatives: Vec<String>,
    pub predicted_at: DateTime<Utc>,
}

// ============================================================================
// OPTIMIZATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original: ResponseStrategy,
    pub optimized: ResponseStrategy,
    pub improvements: Vec<String>,
    /// Within [0.7, 0.95]
    pub confidence: f64,
}
