//! Pattern Detector
//!
//! Five independent detectors over a signal window. Each emits zero or
//! one pattern, and none depends on input order: signals are re-sorted
//! and bucketed internally so the same window always yields the same
//! output.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Duration;

use super::rules::*;
use super::types::*;
use crate::logic::signal::{NarrativeRecord, Signal};

pub struct PatternDetector {
    thresholds: PatternThresholds,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(PatternThresholds::default())
    }
}

impl PatternDetector {
    pub fn new(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PatternThresholds {
        &self.thresholds
    }

    /// Run every detector. Output order is fixed by `PatternKind`.
    pub fn detect(&self, signals: &[Signal], narratives: &[NarrativeRecord]) -> Vec<DetectedPattern> {
        let patterns: Vec<DetectedPattern> = [
            self.detect_sentiment_shift(signals),
            self.detect_coordinated_activity(signals),
            self.detect_viral_risk(signals),
            self.detect_platform_concentration(signals),
            self.detect_influencer_involvement(narratives),
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::debug!(
            signals = signals.len(),
            narratives = narratives.len(),
            patterns = patterns.len(),
            "pattern detection complete"
        );
        patterns
    }

    /// `detect` plus insights, recommendations and an overall confidence
    pub fn analyze(&self, signals: &[Signal], narratives: &[NarrativeRecord]) -> PatternAnalysis {
        let patterns = self.detect(signals, narratives);
        PatternAnalysis {
            insights: insights(&patterns),
            recommendations: recommendations(&patterns),
            confidence: overall_confidence(&patterns),
            patterns,
        }
    }

    // ------------------------------------------------------------------------
    // Detectors
    // ------------------------------------------------------------------------

    fn detect_sentiment_shift(&self, signals: &[Signal]) -> Option<DetectedPattern> {
        let t = &self.thresholds;
        if signals.len() < t.min_signals_for_shift || signals.len() < 2 {
            return None;
        }

        // Newest first; id breaks timestamp ties
        let mut ordered: Vec<&Signal> = signals.iter().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

        let (recent, older) = ordered.split_at(ordered.len() / 2);
        let recent_avg = mean_sentiment(recent);
        let older_avg = mean_sentiment(older);
        let delta = recent_avg - older_avg;
        let shift = delta.abs();

        if shift <= t.sentiment_shift_min {
            return None;
        }

        Some(DetectedPattern {
            kind: PatternKind::SentimentShift,
            description: format!(
                "Detected {} sentiment shift of {:.1}%",
                if delta > 0.0 { "positive" } else { "negative" },
                shift * 100.0
            ),
            confidence: (shift * 2.0).min(SENTIMENT_CONFIDENCE_CAP),
            timeframe: "7 days".to_string(),
            impact: if shift > t.sentiment_shift_high {
                PatternImpact::High
            } else {
                PatternImpact::Medium
            },
            sources: platforms_of(recent.iter().copied()),
        })
    }

    fn detect_coordinated_activity(&self, signals: &[Signal]) -> Option<DetectedPattern> {
        let t = &self.thresholds;

        let mut buckets: BTreeMap<i64, Vec<&Signal>> = BTreeMap::new();
        for signal in signals {
            let hour = signal.timestamp.timestamp().div_euclid(3600);
            buckets.entry(hour).or_default().push(signal);
        }

        // Fullest qualifying bucket; earliest wins a tie
        let mut best: Option<(usize, Vec<String>)> = None;
        for bucket in buckets.values() {
            if bucket.len() < t.burst_min_signals {
                continue;
            }
            let platforms = platforms_of(bucket.iter().copied());
            if platforms.len() < t.burst_min_platforms {
                continue;
            }
            if best.as_ref().map_or(true, |(count, _)| bucket.len() > *count) {
                best = Some((bucket.len(), platforms));
            }
        }

        let (count, platforms) = best?;
        Some(DetectedPattern {
            kind: PatternKind::CoordinatedAttack,
            description: format!(
                "Detected {} mentions across {} platforms within 1 hour",
                count,
                platforms.len()
            ),
            confidence: (count as f64 * BURST_CONFIDENCE_PER_SIGNAL).min(BURST_CONFIDENCE_CAP),
            timeframe: "1 hour".to_string(),
            impact: PatternImpact::High,
            sources: platforms,
        })
    }

    fn detect_viral_risk(&self, signals: &[Signal]) -> Option<DetectedPattern> {
        let t = &self.thresholds;

        // Anchored at the newest signal, not the wall clock
        let newest = signals.iter().map(|s| s.timestamp).max()?;
        let cutoff = newest - Duration::hours(24);
        let window: Vec<&Signal> = signals.iter().filter(|s| s.timestamp > cutoff).collect();

        if window.len() <= t.viral_min_count {
            return None;
        }

        let avg_reach = window.iter().map(|s| finite_or_zero(s.reach)).sum::<f64>() / window.len() as f64;
        if avg_reach <= t.viral_min_reach {
            return None;
        }

        Some(DetectedPattern {
            kind: PatternKind::ViralRisk,
            description: format!(
                "High volume activity detected: {} mentions with avg reach of {:.0}",
                window.len(),
                avg_reach
            ),
            confidence: (window.len() as f64 * VIRAL_CONFIDENCE_PER_SIGNAL).min(VIRAL_CONFIDENCE_CAP),
            timeframe: "24 hours".to_string(),
            impact: PatternImpact::High,
            sources: platforms_of(window.iter().copied()),
        })
    }

    fn detect_platform_concentration(&self, signals: &[Signal]) -> Option<DetectedPattern> {
        if signals.is_empty() {
            return None;
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for signal in signals.iter().filter(|s| !s.platform.is_empty()) {
            *counts.entry(signal.platform.as_str()).or_default() += 1;
        }

        // Alphabetically first platform wins a tie
        let (platform, count) = counts
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (p, c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((p, c)),
            })?;

        let share = count as f64 / signals.len() as f64;
        if share <= self.thresholds.concentration_ratio {
            return None;
        }

        Some(DetectedPattern {
            kind: PatternKind::PlatformMigration,
            description: format!("Activity concentrated on {} ({:.1}% of mentions)", platform, share * 100.0),
            confidence: CONCENTRATION_CONFIDENCE,
            timeframe: "30 days".to_string(),
            impact: PatternImpact::Medium,
            sources: vec![platform.to_string()],
        })
    }

    fn detect_influencer_involvement(&self, narratives: &[NarrativeRecord]) -> Option<DetectedPattern> {
        let influential: Vec<&NarrativeRecord> = narratives
            .iter()
            .filter(|n| n.influence_score.map_or(false, |s| s > self.thresholds.influence_min))
            .collect();

        if influential.is_empty() {
            return None;
        }

        let sources: BTreeSet<String> = influential
            .iter()
            .filter_map(|n| n.source_platform.clone())
            .filter(|p| !p.is_empty())
            .collect();

        Some(DetectedPattern {
            kind: PatternKind::InfluencerInvolvement,
            description: format!("{} high-influence narrative clusters detected", influential.len()),
            confidence: INFLUENCE_CONFIDENCE,
            timeframe: "ongoing".to_string(),
            impact: PatternImpact::High,
            sources: sources.into_iter().collect(),
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn mean_sentiment(signals: &[&Signal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }
    signals.iter().map(|s| finite_or_zero(s.sentiment)).sum::<f64>() / signals.len() as f64
}

/// NaN and infinities count as missing
fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn platforms_of<'a>(signals: impl Iterator<Item = &'a Signal>) -> Vec<String> {
    signals
        .filter(|s| !s.platform.is_empty())
        .map(|s| s.platform.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn insights(patterns: &[DetectedPattern]) -> Vec<String> {
    if patterns.is_empty() {
        return vec![
            "No significant patterns detected in current timeframe".to_string(),
            "Entity appears to have stable online presence".to_string(),
        ];
    }

    let mut out = vec![format!("{} significant patterns identified requiring attention", patterns.len())];

    let high = patterns.iter().filter(|p| p.impact == PatternImpact::High).count();
    if high > 0 {
        out.push(format!("{} high-impact patterns require immediate action", high));
    }

    let platforms: BTreeSet<&str> = patterns.iter().flat_map(|p| p.sources.iter().map(String::as_str)).collect();
    out.push(format!(
        "Activity spans {} platforms: {}",
        platforms.len(),
        platforms.into_iter().collect::<Vec<_>>().join(", ")
    ));
    out
}

pub fn recommendations(patterns: &[DetectedPattern]) -> Vec<String> {
    if patterns.is_empty() {
        return vec!["Continue regular monitoring and maintain current strategy".to_string()];
    }

    patterns
        .iter()
        .map(|p| {
            match p.kind {
                PatternKind::SentimentShift => "Deploy sentiment monitoring and counter-narrative strategy",
                PatternKind::CoordinatedAttack => "Activate rapid response protocols and platform reporting",
                PatternKind::ViralRisk => "Prepare crisis communication plan and positive content saturation",
                PatternKind::PlatformMigration => "Increase monitoring on concentrated platform and diversify presence",
                PatternKind::InfluencerInvolvement => "Engage influencer outreach team and monitor amplification patterns",
            }
            .to_string()
        })
        .collect()
}

pub fn overall_confidence(patterns: &[DetectedPattern]) -> f64 {
    if patterns.is_empty() {
        return NO_PATTERN_CONFIDENCE;
    }
    let mean = patterns.iter().map(|p| p.confidence).sum::<f64>() / patterns.len() as f64;
    (mean * 100.0).round() / 100.0
}
