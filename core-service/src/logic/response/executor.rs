//! Strategy Executor
//!
//! Runs a pending strategy's actions through the dispatcher and records
//! the outcome. Per-action failures (handler errors, timeouts) are
//! contained; the strategy always ends in exactly one terminal status.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;

use super::dispatch::{ActionDispatcher, DispatchTable};
use super::types::{ExecutionPolicy, StrategyExecutionResult};
use crate::error::{ActionError, EngineError, EngineResult};
use crate::logic::strategy::{ActionOutcome, ExecutionRecord, StrategyAction, StrategyStatus};
use crate::storage::{Persistence, StrategyPatch};

pub struct StrategyExecutor {
    policy: ExecutionPolicy,
    store: Arc<dyn Persistence>,
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl StrategyExecutor {
    /// Executor over the default record-only dispatch table
    pub fn new(policy: ExecutionPolicy, store: Arc<dyn Persistence>) -> Self {
        Self {
            policy,
            store,
            dispatcher: Arc::new(DispatchTable::default()),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn policy(&self) -> &ExecutionPolicy {
        &self.policy
    }

    /// NotFound for unknown ids, StateConflict unless the strategy is pending
    pub async fn execute(&self, strategy_id: &str) -> EngineResult<StrategyExecutionResult> {
        let started_at = Utc::now();

        let mut claim = StrategyPatch::transition(StrategyStatus::Pending, StrategyStatus::Executing);
        claim.executed_at = Some(started_at);
        let strategy = self.store.strategies().update(strategy_id, claim).await?;

        tracing::info!(
            strategy = strategy_id,
            actions = strategy.actions.len(),
            concurrent = self.policy.concurrent_actions,
            "executing strategy"
        );

        let (outcomes, fault) = if self.policy.concurrent_actions {
            self.run_concurrent(&strategy.actions).await
        } else {
            self.run_sequential(&strategy.actions).await
        };

        let record = build_record(outcomes, fault, started_at, Utc::now());
        let status = terminal_status(&record);
        self.finish(strategy_id, status, record).await
    }

    /// Actions in order. A panicking dispatch is a top-level fault; the
    /// remaining actions still run so both modes report the same shape.
    async fn run_sequential(&self, actions: &[StrategyAction]) -> (Vec<ActionOutcome>, Option<String>) {
        let mut outcomes = Vec::with_capacity(actions.len());
        let mut fault = None;
        for (index, action) in actions.iter().enumerate() {
            let dispatched = AssertUnwindSafe(dispatch_one(
                self.dispatcher.as_ref(),
                index,
                action,
                self.policy.action_timeout_ms,
            ))
            .catch_unwind()
            .await;

            match dispatched {
                Ok(outcome) => outcomes.push(outcome),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(index, error = %message, "action dispatch panicked");
                    fault.get_or_insert_with(|| format!("action {} aborted: {}", index, message));
                    outcomes.push(aborted_outcome(index, action, message));
                }
            }
        }
        (outcomes, fault)
    }

    /// One task per action; results are collected in action order. A task
    /// that panics is a top-level fault.
    async fn run_concurrent(&self, actions: &[StrategyAction]) -> (Vec<ActionOutcome>, Option<String>) {
        let timeout_ms = self.policy.action_timeout_ms;
        let handles: Vec<_> = actions
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, action)| {
                let dispatcher = Arc::clone(&self.dispatcher);
                tokio::spawn(async move { dispatch_one(dispatcher.as_ref(), index, &action, timeout_ms).await })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(actions.len());
        let mut fault = None;
        for (index, joined) in futures::future::join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!(index, error = %e, "action task aborted");
                    fault.get_or_insert_with(|| format!("action {} aborted: {}", index, e));
                    outcomes.push(aborted_outcome(index, &actions[index], e.to_string()));
                }
            }
        }
        (outcomes, fault)
    }

    /// Persist the terminal status. If that write fails the strategy is
    /// moved to cancelled so it never stays executing.
    async fn finish(
        &self,
        strategy_id: &str,
        status: StrategyStatus,
        record: ExecutionRecord,
    ) -> EngineResult<StrategyExecutionResult> {
        let mut patch = StrategyPatch::transition(StrategyStatus::Executing, status);
        patch.completed_at = Some(record.completed_at);
        patch.execution = Some(record.clone());

        match self.store.strategies().update(strategy_id, patch).await {
            Ok(_) => {
                tracing::info!(
                    strategy = strategy_id,
                    status = status.as_str(),
                    executed = record.executed_actions,
                    failed = record.failed_actions,
                    "strategy execution finished"
                );
                Ok(StrategyExecutionResult {
                    strategy_id: strategy_id.to_string(),
                    status,
                    execution: record,
                })
            }
            Err(e) => {
                tracing::error!(strategy = strategy_id, error = %e, "failed to record execution, cancelling");

                let mut cancelled = record;
                cancelled.fault = Some(format!("failed to record execution: {}", e));
                let mut patch = StrategyPatch::transition(StrategyStatus::Executing, StrategyStatus::Cancelled);
                patch.completed_at = Some(cancelled.completed_at);
                patch.execution = Some(cancelled);

                self.store.strategies().update(strategy_id, patch).await?;
                Err(EngineError::from(e))
            }
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

async fn dispatch_one(
    dispatcher: &dyn ActionDispatcher,
    index: usize,
    action: &StrategyAction,
    timeout_ms: u64,
) -> ActionOutcome {
    let start = Instant::now();

    let result = match tokio::time::timeout(Duration::from_millis(timeout_ms), dispatcher.dispatch(action)).await {
        Ok(result) => result,
        Err(_) => Err(ActionError::Timeout { timeout_ms }),
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(detail) => ActionOutcome {
            index,
            kind: action.kind,
            description: action.description.clone(),
            success: true,
            detail: Some(detail),
            error: None,
            duration_ms,
        },
        Err(e) => {
            tracing::warn!(index, kind = action.kind.as_str(), error = %e, "action failed");
            ActionOutcome {
                index,
                kind: action.kind,
                description: action.description.clone(),
                success: false,
                detail: None,
                error: Some(e.to_string()),
                duration_ms,
            }
        }
    }
}

fn aborted_outcome(index: usize, action: &StrategyAction, error: String) -> ActionOutcome {
    ActionOutcome {
        index,
        kind: action.kind,
        description: action.description.clone(),
        success: false,
        detail: None,
        error: Some(error),
        duration_ms: 0,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

pub fn build_record(
    outcomes: Vec<ActionOutcome>,
    fault: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
) -> ExecutionRecord {
    let executed_actions = outcomes.iter().filter(|o| o.success).count();
    ExecutionRecord {
        executed_actions,
        failed_actions: outcomes.len() - executed_actions,
        outcomes,
        started_at,
        completed_at,
        fault,
    }
}

/// completed: no failures; partial: some of each; cancelled: nothing
/// succeeded, or a fault interrupted the run
pub fn terminal_status(record: &ExecutionRecord) -> StrategyStatus {
    if record.fault.is_some() {
        return StrategyStatus::Cancelled;
    }
    match (record.executed_actions, record.failed_actions) {
        (_, 0) => StrategyStatus::Completed,
        (0, _) => StrategyStatus::Cancelled,
        _ => StrategyStatus::Partial,
    }
}
