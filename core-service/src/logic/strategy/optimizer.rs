//! Strategy Optimizer
//!
//! Derives an improved copy of a strategy from its same-type history.
//! The original row is never touched; the copy is persisted as a new
//! pending strategy, one per optimization run.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::rules::*;
use super::types::*;
use crate::constants::OPTIMIZER_HISTORY_LIMIT;
use crate::error::{EngineError, EngineResult};
use crate::storage::{Persistence, SortOrder, StoreError, StrategyFilter};

pub struct StrategyOptimizer {
    store: Arc<dyn Persistence>,
}

impl StrategyOptimizer {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self { store }
    }

    pub async fn optimize(&self, strategy_id: &str) -> EngineResult<OptimizationResult> {
        let original = self
            .store
            .strategies()
            .get(strategy_id)
            .await?
            .ok_or_else(|| EngineError::strategy_not_found(strategy_id))?;

        let filter = StrategyFilter::for_entity(&original.entity_name)
            .with_type(original.strategy_type)
            .executed()
            .excluding(&original.id);
        let history = self
            .store
            .strategies()
            .query(&filter, SortOrder::NewestFirst, OPTIMIZER_HISTORY_LIMIT)
            .await?;

        let mut result = optimize_with_history(&original, &history, Utc::now());

        // Repeat optimizations get `-optimized-2`, `-optimized-3`, ...
        let base_id = result.optimized.id.clone();
        let mut generation = 1;
        loop {
            match self.store.strategies().insert(result.optimized.clone()).await {
                Ok(()) => break,
                Err(StoreError::Conflict { .. }) => {
                    generation += 1;
                    result.optimized.id = format!("{}-{}", base_id, generation);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            strategy = %original.id,
            optimized = %result.optimized.id,
            improvements = result.improvements.len(),
            confidence = result.confidence,
            "strategy optimized"
        );
        Ok(result)
    }
}

/// Pure derivation over pre-loaded history
pub fn optimize_with_history(
    original: &ResponseStrategy,
    history: &[ResponseStrategy],
    now: DateTime<Utc>,
) -> OptimizationResult {
    let mut improvements = Vec::new();
    let mut confidence = OPTIMIZER_BASE_CONFIDENCE;

    let any_success = history
        .iter()
        .any(|s| s.execution.as_ref().map_or(false, |e| e.is_success()));
    if any_success {
        improvements.push("Optimized action sequence based on successful historical patterns".to_string());
        confidence += 0.1;
    }

    if original.timeframe.contains("hour") {
        improvements.push("Adjusted timeframe based on platform response patterns".to_string());
        confidence += 0.05;
    }

    if original.resources.len() > 3 {
        improvements.push("Streamlined resource allocation for better efficiency".to_string());
        confidence += 0.05;
    }

    if original.priority == StrategyPriority::Medium && history.len() > ELEVATE_PRIORITY_SAMPLES {
        improvements.push("Elevated priority based on entity risk profile".to_string());
        confidence += 0.1;
    }

    let optimized = derive_strategy(original, &improvements, now);

    OptimizationResult {
        original: original.clone(),
        optimized,
        improvements,
        confidence: confidence.min(OPTIMIZER_CONFIDENCE_CAP),
    }
}

fn derive_strategy(original: &ResponseStrategy, improvements: &[String], now: DateTime<Utc>) -> ResponseStrategy {
    let actions = original
        .actions
        .iter()
        .map(|a| StrategyAction {
            timeline: remap(TIMELINE_COMPRESSION, &a.timeline),
            responsible: remap(ROLE_REMAP, &a.responsible),
            kpi: remap(KPI_ENRICHMENT, &a.kpi),
            ..a.clone()
        })
        .collect();

    let mut resources = original.resources.clone();
    resources.extend(OPTIMIZER_RESOURCES.iter().map(|r| r.to_string()));

    ResponseStrategy {
        id: format!("{}-optimized", original.id),
        entity_name: original.entity_name.clone(),
        strategy_type: original.strategy_type,
        title: format!("{} (Optimized)", original.title),
        description: format!("{} - Enhanced with AI optimization", original.description),
        actions,
        priority: original.priority.bumped(),
        timeframe: remap(TIMEFRAME_COMPRESSION, &original.timeframe),
        resources,
        status: StrategyStatus::Pending,
        source_pattern: original.source_pattern,
        derived_from: Some(original.id.clone()),
        improvements: improvements.to_vec(),
        created_at: now,
        updated_at: now,
        executed_at: None,
        completed_at: None,
        execution: None,
    }
}
