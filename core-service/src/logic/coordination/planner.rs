//! Cross-Platform Coordinator
//!
//! Orders strategies into a single dependency chain and drives them
//! through the executor one after another.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::metrics::compute_metrics;
use super::rules::*;
use super::types::*;
use crate::error::{EngineError, EngineResult};
use crate::logic::response::StrategyExecutor;
use crate::logic::strategy::{ResponseStrategy, StrategyPriority, StrategyStatus};
use crate::storage::{Persistence, PlanPatch};

pub struct Coordinator {
    policy: CoordinationPolicy,
    store: Arc<dyn Persistence>,
    executor: Arc<StrategyExecutor>,
}

impl Coordinator {
    pub fn new(policy: CoordinationPolicy, store: Arc<dyn Persistence>, executor: Arc<StrategyExecutor>) -> Self {
        Self {
            policy,
            store,
            executor,
        }
    }

    pub fn policy(&self) -> &CoordinationPolicy {
        &self.policy
    }

    /// Build and persist a pending plan
    pub async fn create_plan(&self, entity_name: &str, strategies: &[ResponseStrategy]) -> EngineResult<CoordinationPlan> {
        let plan = build_plan(entity_name, strategies, Utc::now());
        self.store.plans().insert(plan.clone()).await?;

        tracing::info!(
            plan = %plan.id,
            entity = entity_name,
            steps = plan.steps.len(),
            platforms = plan.platforms.len(),
            "coordination plan created"
        );
        Ok(plan)
    }

    /// Load the strategies by id (NotFound for any missing one) and plan them
    pub async fn create_plan_for_ids(&self, entity_name: &str, strategy_ids: &[String]) -> EngineResult<CoordinationPlan> {
        let mut strategies = Vec::with_capacity(strategy_ids.len());
        for id in strategy_ids {
            let strategy = self
                .store
                .strategies()
                .get(id)
                .await?
                .ok_or_else(|| EngineError::strategy_not_found(id))?;
            strategies.push(strategy);
        }
        self.create_plan(entity_name, &strategies).await
    }

    /// Run every step in order. A failed step never stops later steps
    /// unless `halt_on_critical_failure` is set.
    pub async fn execute_plan(&self, plan_id: &str) -> EngineResult<CoordinationResult> {
        let started_at = Utc::now();

        let mut claim = PlanPatch::transition(PlanStatus::Pending, PlanStatus::Executing);
        claim.started_at = Some(started_at);
        let plan = self.store.plans().update(plan_id, claim).await?;

        tracing::info!(plan = plan_id, steps = plan.steps.len(), "executing coordination plan");

        let mut executed = Vec::new();
        let mut partial = Vec::new();
        let mut failed = Vec::new();
        let mut steps = Vec::with_capacity(plan.steps.len());
        let mut halted = false;

        for step in &plan.steps {
            if halted {
                failed.push(step.strategy_id.clone());
                steps.push(StepResult {
                    strategy_id: step.strategy_id.clone(),
                    execution_order: step.execution_order,
                    status: None,
                    error: Some("skipped after critical step failure".to_string()),
                });
                continue;
            }

            let (status, error) = match self.executor.execute(&step.strategy_id).await {
                Ok(result) => (Some(result.status), None),
                Err(e) => {
                    tracing::warn!(plan = plan_id, strategy = %step.strategy_id, error = %e, "plan step failed");
                    (None, Some(e.to_string()))
                }
            };

            let step_failed = match status {
                Some(StrategyStatus::Completed) => {
                    executed.push(step.strategy_id.clone());
                    false
                }
                Some(StrategyStatus::Partial) => {
                    executed.push(step.strategy_id.clone());
                    partial.push(step.strategy_id.clone());
                    false
                }
                _ => {
                    failed.push(step.strategy_id.clone());
                    true
                }
            };

            if step_failed && self.policy.halt_on_critical_failure && step.priority == StrategyPriority::Critical {
                tracing::warn!(plan = plan_id, strategy = %step.strategy_id, "critical step failed, halting plan");
                halted = true;
            }

            steps.push(StepResult {
                strategy_id: step.strategy_id.clone(),
                execution_order: step.execution_order,
                status,
                error,
            });
        }

        let status = if failed.is_empty() {
            PlanStatus::Completed
        } else {
            PlanStatus::Failed
        };
        let completed_at = Utc::now();
        let result = CoordinationResult {
            plan_id: plan_id.to_string(),
            status,
            executed,
            partial,
            failed,
            steps,
            started_at,
            completed_at,
        };

        let mut finish = PlanPatch::transition(PlanStatus::Executing, status);
        finish.completed_at = Some(completed_at);
        finish.result = Some(result.clone());
        if let Err(e) = self.store.plans().update(plan_id, finish).await {
            tracing::error!(plan = plan_id, error = %e, "failed to record plan result, marking failed");

            let mut failed_result = result;
            failed_result.status = PlanStatus::Failed;
            let mut fallback = PlanPatch::transition(PlanStatus::Executing, PlanStatus::Failed);
            fallback.completed_at = Some(completed_at);
            fallback.result = Some(failed_result);
            if let Err(fallback_err) = self.store.plans().update(plan_id, fallback).await {
                tracing::error!(plan = plan_id, error = %fallback_err, "failed to mark plan failed");
            }
            return Err(e.into());
        }

        tracing::info!(
            plan = plan_id,
            status = status.as_str(),
            executed = result.executed.len(),
            failed = result.failed.len(),
            "coordination plan finished"
        );
        Ok(result)
    }

    pub async fn get_plan(&self, plan_id: &str) -> EngineResult<CoordinationPlan> {
        self.store
            .plans()
            .get(plan_id)
            .await?
            .ok_or_else(|| EngineError::plan_not_found(plan_id))
    }

    pub async fn plan_status(&self, plan_id: &str) -> EngineResult<PlanStatusReport> {
        let plan = self.get_plan(plan_id).await?;
        Ok(PlanStatusReport {
            plan_id: plan.id.clone(),
            status: plan.status,
            total_steps: plan.steps.len(),
            executed: plan.result.as_ref().map_or(0, |r| r.executed.len()),
            failed: plan.result.as_ref().map_or(0, |r| r.failed.len()),
            started_at: plan.started_at,
            completed_at: plan.completed_at,
        })
    }

    pub async fn plan_metrics(&self, plan_id: &str) -> EngineResult<CoordinationMetrics> {
        let plan = self.get_plan(plan_id).await?;
        Ok(compute_metrics(&plan))
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// Pure plan construction: stable priority sort, then a linear chain
pub fn build_plan(entity_name: &str, strategies: &[ResponseStrategy], now: DateTime<Utc>) -> CoordinationPlan {
    let mut ordered: Vec<&ResponseStrategy> = strategies.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut steps = Vec::with_capacity(ordered.len());
    let mut dependencies = Vec::new();
    let mut platforms = BTreeSet::new();

    for (i, strategy) in ordered.iter().enumerate() {
        let depends_on = if i == 0 { None } else { Some(ordered[i - 1].id.clone()) };
        if let Some(prev) = &depends_on {
            dependencies.push(StepDependency {
                strategy_id: strategy.id.clone(),
                depends_on: prev.clone(),
            });
        }

        let step_platforms = strategy.platforms();
        platforms.extend(step_platforms.iter().cloned());

        steps.push(PlanStep {
            strategy_id: strategy.id.clone(),
            strategy_type: strategy.strategy_type,
            priority: strategy.priority,
            execution_order: i + 1,
            depends_on,
            platforms: step_platforms,
            action_count: strategy.actions.len(),
        });
    }

    let timeline_hours = strategies
        .iter()
        .map(|s| parse_timeframe_hours(&s.timeframe))
        .max()
        .unwrap_or(0);

    CoordinationPlan {
        id: format!("plan-{}", Uuid::new_v4()),
        entity_name: entity_name.to_string(),
        plan_name: format!("Multi-platform response for {}", entity_name),
        steps,
        platforms: platforms.into_iter().collect(),
        dependencies,
        timeline_hours,
        status: PlanStatus::Pending,
        created_at: now,
        started_at: None,
        completed_at: None,
        result: None,
    }
}

/// "immediate" -> 1, any hour band -> 24, "N days" -> 24N, else 48
pub fn parse_timeframe_hours(timeframe: &str) -> u32 {
    let lower = timeframe.to_lowercase();

    if lower.contains("immediate") {
        IMMEDIATE_HOURS
    } else if lower.contains("hour") {
        HOUR_BAND_HOURS
    } else if lower.contains("day") {
        let days = first_number(&lower).unwrap_or(1);
        HOURS_PER_DAY.saturating_mul(days)
    } else {
        DEFAULT_TIMEFRAME_HOURS
    }
}

fn first_number(s: &str) -> Option<u32> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
