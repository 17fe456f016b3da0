#![deny(missing_docs)]
#![doc = "Consensus scoring of natural-language proof claims."]

mod heuristic;
mod multi;
mod result;

pub use heuristic::{HeuristicScorer, HeuristicSource, OFFLINE_BASELINE, OFFLINE_SOURCE};
pub use multi::{ConsensusMode, ConsensusSource, MultiSourceScorer, SOURCE_FLOOR_SCORE};
pub use result::{clamp_score, compute_consensus, ConsensusResult, SourceScore};

/// Scores a single claim for logical-soundness signal.
///
/// Implementations never fail: degraded sources are folded into the result.
pub trait ConsensusScorer: Send + Sync {
    /// Evaluates the claim text.
    fn evaluate(&self, claim: &str) -> ConsensusResult;
}
