use serde::{Deserialize, Serialize};

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Score reported by one consensus source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceScore {
    /// Source name.
    pub source: String,
    /// Score in `[0, 100]`.
    pub score: u32,
    /// Short explanation of how the score was obtained.
    pub rationale: String,
    /// Whether the score came from the offline heuristic.
    pub offline: bool,
}

/// Aggregate of one or more source scores for a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Per-source scores in query order.
    pub results: Vec<SourceScore>,
    /// Rounded mean score in `[0, 100]`.
    pub mean: u32,
    /// Population variance rounded to one decimal.
    pub variance: f64,
    /// Agreement between sources in `[0, 100]`.
    pub coherence: u32,
    /// Whether the offline heuristic produced the result.
    pub offline_mode: bool,
}

impl ConsensusResult {
    /// Returns the mean as a float for weighted combinations.
    pub fn mean_score(&self) -> f64 {
        f64::from(self.mean)
    }
}

/// Rounds and clamps a raw score into `[0, 100]`. Non-finite input maps to 0.
pub fn clamp_score(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(SCORE_MIN, SCORE_MAX) as u32
}

/// Aggregates source scores into mean, variance and coherence.
///
/// Coherence is `max(0, 100 - variance)`; a single source, or the offline
/// heuristic, is fully coherent by definition.
pub fn compute_consensus(results: Vec<SourceScore>, offline_mode: bool) -> ConsensusResult {
    if results.is_empty() {
        return ConsensusResult {
            results,
            mean: 0,
            variance: 0.0,
            coherence: 0,
            offline_mode,
        };
    }

    let count = results.len() as f64;
    let mean = results.iter().map(|entry| f64::from(entry.score)).sum::<f64>() / count;
    let variance = results
        .iter()
        .map(|entry| (f64::from(entry.score) - mean).powi(2))
        .sum::<f64>()
        / count;

    let coherence = if offline_mode || results.len() == 1 {
        100
    } else {
        clamp_score(100.0 - variance)
    };

    ConsensusResult {
        mean: clamp_score(mean),
        variance: (variance * 10.0).round() / 10.0,
        coherence,
        offline_mode,
        results,
    }
}
