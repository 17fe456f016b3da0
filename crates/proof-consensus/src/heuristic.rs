use proof_core::ProofError;

use crate::multi::ConsensusSource;
use crate::result::{clamp_score, compute_consensus, ConsensusResult, SourceScore};
use crate::ConsensusScorer;

/// Starting score before adjustments.
pub const OFFLINE_BASELINE: i32 = 75;

/// Name reported for the offline heuristic source.
pub const OFFLINE_SOURCE: &str = "offline-heuristic";

const OFFLINE_RATIONALE: &str = "Offline heuristic evaluation (no API keys)";

const VAGUE_MARKERS: [&str; 6] = [
    "obviously",
    "clearly",
    "trivially",
    "it is known",
    "somehow",
    "basically",
];
const VAGUE_PENALTY: i32 = 5;

const MIN_CLAIM_CHARS: usize = 10;
const SHORT_CLAIM_PENALTY: i32 = 10;

const OPERATOR_TOKENS: [&str; 10] = ["=", "+", "-", "*", "/", "^", "sqrt", "log", "sin", "cos"];
const LOGICAL_CONNECTIVES: [&str; 8] = [
    "therefore",
    "thus",
    "hence",
    "because",
    "since",
    "implies",
    "if",
    "then",
];
const BONUS_PER_TOKEN: i32 = 2;
const BONUS_CAP: i32 = 10;

/// Deterministic offline scorer.
///
/// The score is a pure function of the claim text: vague language and very
/// short claims are penalized, operator tokens and logical connectives earn a
/// capped bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// Creates the scorer.
    pub fn new() -> Self {
        Self
    }

    /// Returns the heuristic score of `claim` in `[0, 100]`.
    pub fn score(&self, claim: &str) -> u32 {
        let lowered = claim.to_lowercase();
        let mut score = OFFLINE_BASELINE;

        score -= VAGUE_PENALTY * count_present(&lowered, &VAGUE_MARKERS);

        if claim.chars().count() < MIN_CLAIM_CHARS {
            score -= SHORT_CLAIM_PENALTY;
        }

        score += (BONUS_PER_TOKEN * count_present(claim, &OPERATOR_TOKENS)).min(BONUS_CAP);
        score += (BONUS_PER_TOKEN * count_present(&lowered, &LOGICAL_CONNECTIVES)).min(BONUS_CAP);

        clamp_score(f64::from(score))
    }
}

impl ConsensusScorer for HeuristicScorer {
    fn evaluate(&self, claim: &str) -> ConsensusResult {
        let entry = SourceScore {
            source: OFFLINE_SOURCE.to_string(),
            score: self.score(claim),
            rationale: OFFLINE_RATIONALE.to_string(),
            offline: true,
        };
        compute_consensus(vec![entry], true)
    }
}

/// The heuristic exposed as a source so it can sit alongside online sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSource {
    scorer: HeuristicScorer,
}

impl ConsensusSource for HeuristicSource {
    fn name(&self) -> &str {
        OFFLINE_SOURCE
    }

    fn score(&self, claim: &str) -> Result<f64, ProofError> {
        Ok(f64::from(self.scorer.score(claim)))
    }
}

fn count_present(text: &str, tokens: &[&str]) -> i32 {
    tokens.iter().filter(|token| text.contains(*token)).count() as i32
}
