//! Engine Facade
//!
//! Wires the nine components over one persistence handle and runs the
//! full cycle: validate -> classify -> detect -> recommend -> generate ->
//! predict -> plan (-> execute). Executed strategies flow back into the
//! recommender as history on the next cycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::{FEEDBACK_HISTORY_LIMIT, INGEST_BASE_CONFIDENCE};
use crate::error::{EngineError, EngineResult};
use crate::logic::coordination::{CoordinationPlan, CoordinationResult, Coordinator};
use crate::logic::patterns::{PatternAnalysis, PatternDetector};
use crate::logic::response::{ActionDispatcher, DispatchTable, StrategyExecutor};
use crate::logic::signal::{NarrativeRecord, Signal};
use crate::logic::strategy::{
    HistoricalEvent, OutcomePredictor, ResponseStrategy, StrategyGenerator, StrategyOptimizer, StrategyPrediction,
    StrategyRecommendation, StrategyRecommender,
};
use crate::logic::threat::{MultiAgentClassifier, ThreatAssessment};
use crate::logic::validation::{ConfidenceTier, ConfidenceValidator};
use crate::storage::{Persistence, SortOrder, StrategyFilter};

pub const INGEST_OPERATION: &str = "signal_ingest";

// ============================================================================
// CYCLE TYPES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleOptions {
    /// Execute the coordination plan before returning
    pub execute_plan: bool,
}

/// Per-tier counts for one batch of signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub total: usize,
    pub accepted: usize,
    pub review: usize,
    pub quarantined: usize,
    pub discarded: usize,
}

impl IngestSummary {
    fn count(&mut self, tier: ConfidenceTier) {
        self.total += 1;
        match tier {
            ConfidenceTier::Accept => self.accepted += 1,
            ConfidenceTier::Review => self.review += 1,
            ConfidenceTier::Quarantine => self.quarantined += 1,
            ConfidenceTier::Discard => self.discarded += 1,
        }
    }

    pub fn admitted(&self) -> usize {
        self.total - self.discarded
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub entity_name: String,
    pub ingest: IngestSummary,
    pub threats: Vec<ThreatAssessment>,
    pub analysis: PatternAnalysis,
    pub recommendation: StrategyRecommendation,
    pub strategies: Vec<ResponseStrategy>,
    pub predictions: Vec<StrategyPrediction>,
    pub plan: CoordinationPlan,
    /// Present when the cycle executed its plan
    pub execution: Option<CoordinationResult>,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct Engine {
    config: EngineConfig,
    store: Arc<dyn Persistence>,
    validator: Arc<ConfidenceValidator>,
    classifier: MultiAgentClassifier,
    detector: PatternDetector,
    recommender: StrategyRecommender,
    generator: StrategyGenerator,
    predictor: OutcomePredictor,
    optimizer: StrategyOptimizer,
    executor: Arc<StrategyExecutor>,
    coordinator: Coordinator,
}

impl Engine {
    /// Engine over the default record-only dispatch table
    pub fn new(config: EngineConfig, store: Arc<dyn Persistence>) -> Self {
        Self::with_dispatcher(config, store, Arc::new(DispatchTable::default()))
    }

    pub fn with_dispatcher(
        config: EngineConfig,
        store: Arc<dyn Persistence>,
        dispatcher: Arc<dyn ActionDispatcher>,
    ) -> Self {
        let validator = Arc::new(ConfidenceValidator::new(config.validation.clone(), store.clone()));
        let executor = Arc::new(
            StrategyExecutor::new(config.execution.clone(), store.clone()).with_dispatcher(dispatcher),
        );

        Self {
            classifier: MultiAgentClassifier::new(validator.clone()),
            detector: PatternDetector::new(config.patterns.clone()),
            recommender: StrategyRecommender::new(config.recommender.clone(), store.clone()),
            generator: StrategyGenerator::new(store.clone()),
            predictor: OutcomePredictor::new(store.clone()),
            optimizer: StrategyOptimizer::new(store.clone()),
            coordinator: Coordinator::new(config.coordination.clone(), store.clone(), executor.clone()),
            executor,
            validator,
            store,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn Persistence> {
        &self.store
    }

    pub fn validator(&self) -> &ConfidenceValidator {
        &self.validator
    }

    pub fn classifier(&self) -> &MultiAgentClassifier {
        &self.classifier
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn recommender(&self) -> &StrategyRecommender {
        &self.recommender
    }

    pub fn generator(&self) -> &StrategyGenerator {
        &self.generator
    }

    pub fn predictor(&self) -> &OutcomePredictor {
        &self.predictor
    }

    pub fn optimizer(&self) -> &StrategyOptimizer {
        &self.optimizer
    }

    pub fn executor(&self) -> &StrategyExecutor {
        &self.executor
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Executed strategies for the entity, newest first, as recommender history
    pub async fn history(&self, entity_name: &str) -> EngineResult<Vec<HistoricalEvent>> {
        let executed = self
            .store
            .strategies()
            .query(
                &StrategyFilter::for_entity(entity_name).executed(),
                SortOrder::NewestFirst,
                FEEDBACK_HISTORY_LIMIT,
            )
            .await?;
        Ok(executed.iter().filter_map(HistoricalEvent::from_strategy).collect())
    }

    pub async fn strategy(&self, strategy_id: &str) -> EngineResult<ResponseStrategy> {
        self.store
            .strategies()
            .get(strategy_id)
            .await?
            .ok_or_else(|| EngineError::strategy_not_found(strategy_id))
    }

    /// Recommendation with history loaded from the store
    pub async fn recommend(
        &self,
        entity_name: &str,
        patterns: &[crate::logic::patterns::DetectedPattern],
    ) -> EngineResult<StrategyRecommendation> {
        let history = self.history(entity_name).await?;
        Ok(self.recommender.recommend(entity_name, patterns, &history).await)
    }

    /// One full pass over a signal window for `entity_name`
    pub async fn run_cycle(
        &self,
        entity_name: &str,
        signals: &[Signal],
        narratives: &[NarrativeRecord],
        options: CycleOptions,
    ) -> EngineResult<CycleReport> {
        tracing::info!(entity = entity_name, signals = signals.len(), "engine cycle started");

        // 1. Validate every signal; discard-tier signals stop here
        let mut ingest = IngestSummary::default();
        let mut admitted = Vec::new();
        let mut threats = Vec::new();
        for signal in signals {
            let validation = self
                .validator
                .validate(&signal.text, entity_name, &signal.platform, INGEST_BASE_CONFIDENCE, INGEST_OPERATION)
                .await;
            ingest.count(validation.tier);
            if !validation.is_valid() {
                continue;
            }

            // 2. Classify admitted signals
            threats.push(
                self.classifier
                    .classify_validated(&signal.text, entity_name, &signal.platform, None, validation),
            );
            admitted.push(signal.clone());
        }

        // 3. Aggregate patterns over the admitted window
        let analysis = self.detector.analyze(&admitted, narratives);

        // 4. Recommend from learned outcomes and execution history
        let recommendation = self.recommend(entity_name, &analysis.patterns).await?;

        // 5. Generate and persist strategies
        let strategies = self.generator.generate(entity_name, &analysis.patterns).await?;

        // 6. Predict each strategy's outcome
        let mut predictions = Vec::with_capacity(strategies.len());
        for strategy in &strategies {
            predictions.push(self.predictor.predict(strategy, entity_name).await?);
        }

        // 7. Plan, and optionally execute
        let plan = self.coordinator.create_plan(entity_name, &strategies).await?;
        let execution = if options.execute_plan {
            Some(self.coordinator.execute_plan(&plan.id).await?)
        } else {
            None
        };

        tracing::info!(
            entity = entity_name,
            admitted = ingest.admitted(),
            discarded = ingest.discarded,
            patterns = analysis.patterns.len(),
            strategies = strategies.len(),
            "engine cycle finished"
        );

        Ok(CycleReport {
            entity_name: entity_name.to_string(),
            ingest,
            threats,
            analysis,
            recommendation,
            strategies,
            predictions,
            plan,
            execution,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
