//! Cosine similarity and nearest learned-pattern lookup.

use serde::{Deserialize, Serialize};

use super::types::LearnedPattern;

/// A learned pattern and how closely it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: LearnedPattern,
    pub similarity: f64,
}

/// Cosine similarity between two vectors.
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Best candidate strictly above `min_similarity`. Earlier candidates win
/// ties, so newest-first input favours recent patterns.
pub fn best_match(candidates: &[LearnedPattern], features: &[f64], min_similarity: f64) -> Option<PatternMatch> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let similarity = cosine_similarity(features, &candidate.features);
        if best.map_or(true, |(_, s)| similarity > s) {
            best = Some((i, similarity));
        }
    }

    let (index, similarity) = best?;
    if similarity <= min_similarity {
        return None;
    }
    Some(PatternMatch {
        pattern: candidates[index].clone(),
        similarity,
    })
}
