//! Storage Module - Persistence Collaborator
//!
//! Typed repositories behind one `Persistence` handle. The engine never
//! sees the storage technology; it only needs insert, update and
//! filtered/ordered/limited queries.
//!
//! # Architecture
//! - `mod.rs`: repository traits, filters, patches, `StoreError`
//! - `memory.rs`: in-process backend (`parking_lot` locks)
//! - `audit_log.rs`: append-only JSONL validation audit log
//!
//! Status transitions go through `update` with an expected status, so
//! two callers racing on the same strategy or plan cannot both win.

pub mod audit_log;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::logic::coordination::{CoordinationPlan, CoordinationResult, PlanStatus};
use crate::logic::strategy::similarity::{best_match, PatternMatch};
use crate::logic::strategy::{
    ExecutionRecord, LearnedPattern, ResponseStrategy, StrategyPrediction, StrategyStatus, StrategyType,
};
use crate::logic::validation::ValidationAuditRecord;

pub use audit_log::JsonlAuditLog;
pub use memory::MemoryPersistence;

// ============================================================================
// ERRORS
// ============================================================================

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Compare-and-set precondition failed, or the id already exists
    #[error("{kind} '{id}' is {actual}, expected {expected}")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: String,
        actual: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

// ============================================================================
// QUERY SHAPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_name: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub rejections_only: bool,
}

impl AuditFilter {
    pub fn matches(&self, record: &ValidationAuditRecord) -> bool {
        self.entity_name.as_ref().map_or(true, |e| &record.entity_name == e)
            && self.since.map_or(true, |t| record.recorded_at >= t)
            && (!self.rejections_only || record.outcome.is_rejection())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrategyFilter {
    pub entity_name: Option<String>,
    pub strategy_type: Option<StrategyType>,
    pub status: Option<StrategyStatus>,
    /// Only strategies that carry an execution record
    pub executed_only: bool,
    pub exclude_id: Option<String>,
}

impl StrategyFilter {
    pub fn for_entity(entity_name: &str) -> Self {
        Self {
            entity_name: Some(entity_name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, strategy_type: StrategyType) -> Self {
        self.strategy_type = Some(strategy_type);
        self
    }

    pub fn with_status(mut self, status: StrategyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn executed(mut self) -> Self {
        self.executed_only = true;
        self
    }

    pub fn excluding(mut self, id: &str) -> Self {
        self.exclude_id = Some(id.to_string());
        self
    }

    pub fn matches(&self, s: &ResponseStrategy) -> bool {
        self.entity_name.as_ref().map_or(true, |e| &s.entity_name == e)
            && self.strategy_type.map_or(true, |t| s.strategy_type == t)
            && self.status.map_or(true, |st| s.status == st)
            && (!self.executed_only || s.execution.is_some())
            && self.exclude_id.as_ref().map_or(true, |id| &s.id != id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    pub entity_name: Option<String>,
    pub status: Option<PlanStatus>,
}

impl PlanFilter {
    pub fn matches(&self, p: &CoordinationPlan) -> bool {
        self.entity_name.as_ref().map_or(true, |e| &p.entity_name == e)
            && self.status.map_or(true, |st| p.status == st)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredictionFilter {
    pub strategy_id: Option<String>,
    pub entity_name: Option<String>,
}

impl PredictionFilter {
    pub fn matches(&self, p: &StrategyPrediction) -> bool {
        self.strategy_id.as_ref().map_or(true, |id| &p.strategy_id == id)
            && self.entity_name.as_ref().map_or(true, |e| &p.entity_name == e)
    }
}

// ============================================================================
// PATCHES
// ============================================================================

/// Partial update. `expect_status` turns it into a compare-and-set.
#[derive(Debug, Clone, Default)]
pub struct StrategyPatch {
    pub expect_status: Option<StrategyStatus>,
    pub status: Option<StrategyStatus>,
    pub executed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub execution: Option<ExecutionRecord>,
}

impl StrategyPatch {
    pub fn transition(from: StrategyStatus, to: StrategyStatus) -> Self {
        Self {
            expect_status: Some(from),
            status: Some(to),
            ..Default::default()
        }
    }

    pub fn apply(self, s: &mut ResponseStrategy) {
        if let Some(status) = self.status {
            s.status = status;
        }
        if self.executed_at.is_some() {
            s.executed_at = self.executed_at;
        }
        if self.completed_at.is_some() {
            s.completed_at = self.completed_at;
        }
        if self.execution.is_some() {
            s.execution = self.execution;
        }
        s.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub expect_status: Option<PlanStatus>,
    pub status: Option<PlanStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<CoordinationResult>,
}

impl PlanPatch {
    pub fn transition(from: PlanStatus, to: PlanStatus) -> Self {
        Self {
            expect_status: Some(from),
            status: Some(to),
            ..Default::default()
        }
    }

    pub fn apply(self, p: &mut CoordinationPlan) {
        if let Some(status) = self.status {
            p.status = status;
        }
        if self.started_at.is_some() {
            p.started_at = self.started_at;
        }
        if self.completed_at.is_some() {
            p.completed_at = self.completed_at;
        }
        if self.result.is_some() {
            p.result = self.result;
        }
    }
}

// ============================================================================
// REPOSITORIES
// ============================================================================

/// Append-only validation audit trail
#[async_trait]
pub trait ValidationStore: Send + Sync {
    async fn append(&self, record: ValidationAuditRecord) -> StoreResult<()>;

    async fn query(&self, filter: &AuditFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<ValidationAuditRecord>>;
}

#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Conflict when the id already exists
    async fn insert(&self, strategy: ResponseStrategy) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<ResponseStrategy>>;

    /// Returns the updated row. NotFound for unknown ids, Conflict when
    /// `expect_status` does not match.
    async fn update(&self, id: &str, patch: StrategyPatch) -> StoreResult<ResponseStrategy>;

    async fn query(&self, filter: &StrategyFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<ResponseStrategy>>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn insert(&self, plan: CoordinationPlan) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<CoordinationPlan>>;

    async fn update(&self, id: &str, patch: PlanPatch) -> StoreResult<CoordinationPlan>;

    async fn query(&self, filter: &PlanFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<CoordinationPlan>>;
}

#[async_trait]
pub trait LearnedPatternStore: Send + Sync {
    async fn insert(&self, pattern: LearnedPattern) -> StoreResult<()>;

    /// Newest first
    async fn recent(&self, entity_name: &str, limit: usize) -> StoreResult<Vec<LearnedPattern>>;

    /// Nearest neighbour by cosine similarity. The default is a linear
    /// scan over `recent`; indexed backends can override it.
    async fn find_best_match(
        &self,
        entity_name: &str,
        features: &[f64],
        min_similarity: f64,
        lookback: usize,
    ) -> StoreResult<Option<PatternMatch>> {
        let candidates = self.recent(entity_name, lookback).await?;
        Ok(best_match(&candidates, features, min_similarity))
    }
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn insert(&self, prediction: StrategyPrediction) -> StoreResult<()>;

    async fn query(&self, filter: &PredictionFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<StrategyPrediction>>;
}

/// One handle over every repository
pub trait Persistence: Send + Sync {
    fn validations(&self) -> &dyn ValidationStore;
    fn strategies(&self) -> &dyn StrategyStore;
    fn plans(&self) -> &dyn PlanStore;
    fn learned_patterns(&self) -> &dyn LearnedPatternStore;
    fn predictions(&self) -> &dyn PredictionStore;
}

/// Apply order and limit to rows already in insertion (oldest first) order
pub(crate) fn order_and_limit<T>(mut rows: Vec<T>, order: SortOrder, limit: usize) -> Vec<T> {
    if order == SortOrder::NewestFirst {
        rows.reverse();
    }
    rows.truncate(limit);
    rows
}
