//! Strategy Generator
//!
//! Expands detected patterns into response strategies from fixed
//! templates. An empty pattern set still produces a baseline monitoring
//! strategy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::*;
use crate::error::EngineResult;
use crate::logic::patterns::{DetectedPattern, PatternImpact, PatternKind};
use crate::storage::Persistence;

pub struct StrategyGenerator {
    store: Arc<dyn Persistence>,
}

impl StrategyGenerator {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self { store }
    }

    /// Build and persist one strategy per pattern (status pending)
    pub async fn generate(&self, entity_name: &str, patterns: &[DetectedPattern]) -> EngineResult<Vec<ResponseStrategy>> {
        let strategies = build_strategies(entity_name, patterns, Utc::now());

        for strategy in &strategies {
            self.store.strategies().insert(strategy.clone()).await?;
        }

        tracing::info!(
            entity = entity_name,
            patterns = patterns.len(),
            strategies = strategies.len(),
            "response strategies generated"
        );
        Ok(strategies)
    }
}

/// Pure template expansion
pub fn build_strategies(entity_name: &str, patterns: &[DetectedPattern], now: DateTime<Utc>) -> Vec<ResponseStrategy> {
    if patterns.is_empty() {
        return vec![baseline_strategy(entity_name, now)];
    }
    patterns.iter().map(|p| strategy_for_pattern(entity_name, p, now)).collect()
}

fn strategy_for_pattern(entity_name: &str, pattern: &DetectedPattern, now: DateTime<Utc>) -> ResponseStrategy {
    let high = pattern.impact == PatternImpact::High;
    let sources = &pattern.sources;

    let (strategy_type, title, description, priority, timeframe, resources, actions) = match pattern.kind {
        PatternKind::SentimentShift => (
            StrategyType::CounterNarrative,
            "Sentiment Recovery Campaign",
            "Address detected sentiment shift through targeted positive content deployment",
            if high { StrategyPriority::Critical } else { StrategyPriority::High },
            "48-72 hours",
            &["Content Team", "Social Media Manager", "PR Team"][..],
            vec![
                StrategyAction::new(
                    ActionKind::ContentDeploy,
                    "Deploy positive content across affected platforms",
                    "6 hours",
                    "Content Team",
                    "Sentiment score improvement",
                )
                .on_platforms(sources),
                StrategyAction::new(
                    ActionKind::Generic,
                    "Engage with positive mentions and testimonials",
                    "12 hours",
                    "Social Media Manager",
                    "Engagement rate increase",
                ),
                StrategyAction::new(
                    ActionKind::Monitor,
                    "Monitor sentiment metrics hourly",
                    "Ongoing",
                    "Analytics Team",
                    "Sentiment tracking",
                ),
            ],
        ),
        PatternKind::CoordinatedAttack => (
            StrategyType::Defensive,
            "Coordinated Attack Response",
            "Counter coordinated attack through platform reporting and rapid response",
            StrategyPriority::Critical,
            "2-6 hours",
            &["Legal Team", "Platform Relations", "Crisis Response"][..],
            vec![
                StrategyAction::new(
                    ActionKind::FileReport,
                    "File platform violation reports",
                    "1 hour",
                    "Platform Relations",
                    "Reports filed",
                )
                .on_platforms(sources),
                StrategyAction::new(
                    ActionKind::Generic,
                    "Activate crisis communication protocols",
                    "2 hours",
                    "Crisis Response",
                    "Response deployment",
                ),
                StrategyAction::new(
                    ActionKind::Generic,
                    "Document attack for legal analysis",
                    "4 hours",
                    "Legal Team",
                    "Evidence collection",
                ),
            ],
        ),
        PatternKind::ViralRisk => (
            StrategyType::Proactive,
            "Viral Risk Mitigation",
            "Proactive measures to control viral spread and narrative",
            StrategyPriority::Critical,
            "1-4 hours",
            &["Crisis Team", "Influencer Network", "Content Team"][..],
            vec![
                StrategyAction::new(
                    ActionKind::ActivateInfluencers,
                    "Activate influencer network for positive amplification",
                    "30 minutes",
                    "Influencer Relations",
                    "Positive mention velocity",
                )
                .on_platforms(sources),
                StrategyAction::new(
                    ActionKind::ContentDeploy,
                    "Deploy counter-narrative content",
                    "1 hour",
                    "Content Team",
                    "Content reach and engagement",
                ),
                StrategyAction::new(
                    ActionKind::Monitor,
                    "Monitor amplification metrics",
                    "Real-time",
                    "Analytics Team",
                    "Viral coefficient tracking",
                ),
            ],
        ),
        PatternKind::PlatformMigration => (
            StrategyType::Proactive,
            "Platform Concentration Response",
            "Rebalance presence away from the platform concentrating activity",
            if high { StrategyPriority::High } else { StrategyPriority::Medium },
            "24-48 hours",
            &["Social Media Manager", "Content Team", "Analytics Team"][..],
            vec![
                StrategyAction::new(
                    ActionKind::Monitor,
                    "Increase monitoring on concentrated platform",
                    "Ongoing",
                    "Analytics Team",
                    "Mention volume tracking",
                )
                .on_platforms(sources),
                StrategyAction::new(
                    ActionKind::ContentDeploy,
                    "Publish diversified content on underrepresented platforms",
                    "12 hours",
                    "Content Team",
                    "Cross-platform reach",
                ),
            ],
        ),
        PatternKind::InfluencerInvolvement => (
            StrategyType::Engagement,
            "Influencer Engagement Strategy",
            "Strategic engagement with involved influencers",
            if high { StrategyPriority::High } else { StrategyPriority::Medium },
            "24-48 hours",
            &["Influencer Relations", "PR Team", "Legal Counsel"][..],
            vec![
                StrategyAction::new(
                    ActionKind::Generic,
                    "Identify and categorize involved influencers",
                    "4 hours",
                    "Research Team",
                    "Influencer mapping complete",
                )
                .on_platforms(sources),
                StrategyAction::new(
                    ActionKind::ActivateInfluencers,
                    "Reach out to positive influencers",
                    "8 hours",
                    "Influencer Relations",
                    "Positive responses",
                ),
                StrategyAction::new(
                    ActionKind::Monitor,
                    "Monitor influencer sentiment shifts",
                    "Ongoing",
                    "Analytics Team",
                    "Sentiment tracking",
                ),
            ],
        ),
    };

    ResponseStrategy {
        id: format!("{}-{}", pattern.kind.as_str(), Uuid::new_v4()),
        entity_name: entity_name.to_string(),
        strategy_type,
        title: title.to_string(),
        description: description.to_string(),
        actions,
        priority,
        timeframe: timeframe.to_string(),
        resources: resources.iter().map(|r| r.to_string()).collect(),
        status: StrategyStatus::Pending,
        source_pattern: Some(pattern.kind),
        derived_from: None,
        improvements: Vec::new(),
        created_at: now,
        updated_at: now,
        executed_at: None,
        completed_at: None,
        execution: None,
    }
}

fn baseline_strategy(entity_name: &str, now: DateTime<Utc>) -> ResponseStrategy {
    ResponseStrategy {
        id: format!("baseline-{}", Uuid::new_v4()),
        entity_name: entity_name.to_string(),
        strategy_type: StrategyType::Proactive,
        title: "Baseline Monitoring & Maintenance".to_string(),
        description: "Standard monitoring and positive presence maintenance".to_string(),
        actions: vec![
            StrategyAction::new(
                ActionKind::ContentDeploy,
                "Continue regular content publishing",
                "Daily",
                "Content Team",
                "Content consistency",
            ),
            StrategyAction::new(
                ActionKind::Monitor,
                "Monitor brand mentions across platforms",
                "Continuous",
                "Monitoring Team",
                "Coverage completeness",
            ),
            StrategyAction::new(
                ActionKind::Generic,
                "Engage with positive community interactions",
                "Daily",
                "Community Manager",
                "Engagement rate",
            ),
        ],
        priority: StrategyPriority::Low,
        timeframe: "Ongoing".to_string(),
        resources: vec!["Monitoring Team".to_string(), "Content Team".to_string()],
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
