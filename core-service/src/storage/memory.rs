//! In-memory backend
//!
//! Rows live in insertion order behind `parking_lot` locks. Locks are
//! never held across an await point.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::*;

// ============================================================================
// VALIDATION AUDIT
// ============================================================================

#[derive(Default)]
pub struct MemoryValidationStore {
    rows: RwLock<Vec<ValidationAuditRecord>>,
}

#[async_trait]
impl ValidationStore for MemoryValidationStore {
    async fn append(&self, record: ValidationAuditRecord) -> StoreResult<()> {
        self.rows.write().push(record);
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<ValidationAuditRecord>> {
        let rows: Vec<_> = self.rows.read().iter().filter(|r| filter.matches(r)).cloned().collect();
        Ok(order_and_limit(rows, order, limit))
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================

#[derive(Default)]
pub struct MemoryStrategyStore {
    rows: RwLock<Vec<ResponseStrategy>>,
}

#[async_trait]
impl StrategyStore for MemoryStrategyStore {
    async fn insert(&self, strategy: ResponseStrategy) -> StoreResult<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|s| s.id == strategy.id) {
            return Err(StoreError::Conflict {
                kind: "strategy",
                id: strategy.id,
                expected: "absent".to_string(),
                actual: "present".to_string(),
            });
        }
        rows.push(strategy);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<ResponseStrategy>> {
        Ok(self.rows.read().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: &str, patch: StrategyPatch) -> StoreResult<ResponseStrategy> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound { kind: "strategy", id: id.to_string() })?;

        if let Some(expected) = patch.expect_status {
            if row.status != expected {
                return Err(StoreError::Conflict {
                    kind: "strategy",
                    id: id.to_string(),
                    expected: expected.to_string(),
                    actual: row.status.to_string(),
                });
            }
        }

        patch.apply(row);
        Ok(row.clone())
    }

    async fn query(&self, filter: &StrategyFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<ResponseStrategy>> {
        let rows: Vec<_> = self.rows.read().iter().filter(|s| filter.matches(s)).cloned().collect();
        Ok(order_and_limit(rows, order, limit))
    }
}

// ============================================================================
// PLANS
// ============================================================================

#[derive(Default)]
pub struct MemoryPlanStore {
    rows: RwLock<Vec<CoordinationPlan>>,
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn insert(&self, plan: CoordinationPlan) -> StoreResult<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|p| p.id == plan.id) {
            return Err(StoreError::Conflict {
                kind: "plan",
                id: plan.id,
                expected: "absent".to_string(),
                actual: "present".to_string(),
            });
        }
        rows.push(plan);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CoordinationPlan>> {
        Ok(self.rows.read().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: &str, patch: PlanPatch) -> StoreResult<CoordinationPlan> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound { kind: "plan", id: id.to_string() })?;

        if let Some(expected) = patch.expect_status {
            if row.status != expected {
                return Err(StoreError::Conflict {
                    kind: "plan",
                    id: id.to_string(),
                    expected: expected.to_string(),
                    actual: row.status.to_string(),
                });
            }
        }

        patch.apply(row);
        Ok(row.clone())
    }

    async fn query(&self, filter: &PlanFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<CoordinationPlan>> {
        let rows: Vec<_> = self.rows.read().iter().filter(|p| filter.matches(p)).cloned().collect();
        Ok(order_and_limit(rows, order, limit))
    }
}

// ============================================================================
// LEARNED PATTERNS / PREDICTIONS
// ============================================================================

#[derive(Default)]
pub struct MemoryLearnedPatternStore {
    rows: RwLock<Vec<LearnedPattern>>,
}

#[async_trait]
impl LearnedPatternStore for MemoryLearnedPatternStore {
    async fn insert(&self, pattern: LearnedPattern) -> StoreResult<()> {
        self.rows.write().push(pattern);
        Ok(())
    }

    async fn recent(&self, entity_name: &str, limit: usize) -> StoreResult<Vec<LearnedPattern>> {
        let rows: Vec<_> = self
            .rows
            .read()
            .iter()
            .filter(|p| p.entity_name == entity_name)
            .cloned()
            .collect();
        Ok(order_and_limit(rows, SortOrder::NewestFirst, limit))
    }
}

#[derive(Default)]
pub struct MemoryPredictionStore {
    rows: RwLock<Vec<StrategyPrediction>>,
}

#[async_trait]
impl PredictionStore for MemoryPredictionStore {
    async fn insert(&self, prediction: StrategyPrediction) -> StoreResult<()> {
        self.rows.write().push(prediction);
        Ok(())
    }

    async fn query(&self, filter: &PredictionFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<StrategyPrediction>> {
        let rows: Vec<_> = self.rows.read().iter().filter(|p| filter.matches(p)).cloned().collect();
        Ok(order_and_limit(rows, order, limit))
    }
}

// ============================================================================
// PERSISTENCE HANDLE
// ============================================================================

/// Every repository in memory; individual repositories can be swapped
pub struct MemoryPersistence {
    validations: Arc<dyn ValidationStore>,
    strategies: Arc<dyn StrategyStore>,
    plans: Arc<dyn PlanStore>,
    learned_patterns: Arc<dyn LearnedPatternStore>,
    predictions: Arc<dyn PredictionStore>,
}

impl Default for MemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self {
            validations: Arc::new(MemoryValidationStore::default()),
            strategies: Arc::new(MemoryStrategyStore::default()),
            plans: Arc::new(MemoryPlanStore::default()),
            learned_patterns: Arc::new(MemoryLearnedPatternStore::default()),
            predictions: Arc::new(MemoryPredictionStore::default()),
        }
    }

    /// e.g. a `JsonlAuditLog`
    pub fn with_validation_store(mut self, store: Arc<dyn ValidationStore>) -> Self {
        self.validations = store;
        self
    }

    pub fn with_strategy_store(mut self, store: Arc<dyn StrategyStore>) -> Self {
        self.strategies = store;
        self
    }

    pub fn with_plan_store(mut self, store: Arc<dyn PlanStore>) -> Self {
        self.plans = store;
        self
    }

    pub fn with_learned_pattern_store(mut self, store: Arc<dyn LearnedPatternStore>) -> Self {
        self.learned_patterns = store;
        self
    }
}

impl Persistence for MemoryPersistence {
    fn validations(&self) -> &dyn ValidationStore {
        self.validations.as_ref()
    }

    fn strategies(&self) -> &dyn StrategyStore {
        self.strategies.as_ref()
    }

    fn plans(&self) -> &dyn PlanStore {
        self.plans.as_ref()
    }

    fn learned_patterns(&self) -> &dyn LearnedPatternStore {
        self.learned_patterns.as_ref()
    }

    fn predictions(&self) -> &dyn PredictionStore {
        self.predictions.as_ref()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::strategy::{StrategyPriority, StrategyStatus, StrategyType};

    fn strategy(id: &str, entity: &str) -> ResponseStrategy {
        let now = Utc::now();
        ResponseStrategy {
            id: id.to_string(),
            entity_name: entity.to_string(),
            strategy_type: StrategyType::Defensive,
            title: "t".to_string(),
            description: "d".to_string(),
            actions: Vec::new(),
            priority: StrategyPriority::Low,
            timeframe: "Ongoing".to_string(),
            resources: Vec::new(),
            status: StrategyStatus::Pending,
            source_pattern: None,
            derived_from: None,
            improvements: Vec::new(),
            created_at: now,
            updated_at: now,
            executed_at: None,
            completed_at: None,
            execution: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = MemoryStrategyStore::default();
        store.insert(strategy("s-1", "Acme")).await.unwrap();
        let err = store.insert(strategy("s-1", "Acme")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_compare_and_set_transition() {
        let store = MemoryStrategyStore::default();
        store.insert(strategy("s-1", "Acme")).await.unwrap();

        let updated = store
            .update("s-1", StrategyPatch::transition(StrategyStatus::Pending, StrategyStatus::Executing))
            .await
            .unwrap();
        assert_eq!(updated.status, StrategyStatus::Executing);

        let err = store
            .update("s-1", StrategyPatch::transition(StrategyStatus::Pending, StrategyStatus::Executing))
            .await
            .unwrap_err();
        match err {
            StoreError::Conflict { expected, actual, .. } => {
                assert_eq!(expected, "pending");
                assert_eq!(actual, "executing");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryPlanStore::default();
        let err = store.update("missing", PlanPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "plan", .. }));
    }

    #[tokio::test]
    async fn test_query_order_and_limit() {
        let store = MemoryStrategyStore::default();
        for i in 0..5 {
            store.insert(strategy(&format!("s-{i}"), "Acme")).await.unwrap();
        }
        store.insert(strategy("other", "Globex")).await.unwrap();

        let newest = store
            .query(&StrategyFilter::for_entity("Acme"), SortOrder::NewestFirst, 2)
            .await
            .unwrap();
        let ids: Vec<_> = newest.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-4", "s-3"]);

        let oldest = store
            .query(&StrategyFilter::for_entity("Acme").excluding("s-0"), SortOrder::OldestFirst, 10)
            .await
            .unwrap();
        assert_eq!(oldest.len(), 4);
        assert_eq!(oldest[0].id, "s-1");
    }
}
