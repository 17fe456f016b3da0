use proof_core::ProofError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::heuristic::HeuristicScorer;
use crate::result::{clamp_score, compute_consensus, ConsensusResult, SourceScore};
use crate::ConsensusScorer;

/// Score assigned to a source that failed or returned a non-finite value.
pub const SOURCE_FLOOR_SCORE: u32 = 50;

/// External scorer queried by [`MultiSourceScorer`].
pub trait ConsensusSource: Send + Sync {
    /// Stable name reported in [`SourceScore::source`].
    fn name(&self) -> &str;

    /// Scores the claim on a `[0, 100]` scale.
    fn score(&self, claim: &str) -> Result<f64, ProofError>;
}

/// Whether configured sources are queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusMode {
    /// Only the built-in heuristic runs.
    #[default]
    Offline,
    /// Configured sources are queried when any exist.
    Online,
}

/// Consensus scorer that aggregates several sources.
///
/// Runs the offline heuristic unless it was switched to
/// [`ConsensusMode::Online`] and at least one source is registered.
#[derive(Default)]
pub struct MultiSourceScorer {
    mode: ConsensusMode,
    sources: Vec<Box<dyn ConsensusSource>>,
    heuristic: HeuristicScorer,
}

impl MultiSourceScorer {
    /// Creates an offline scorer with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional source.
    pub fn with_source(mut self, source: impl ConsensusSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Switches the scorer to online mode.
    pub fn online(mut self) -> Self {
        self.mode = ConsensusMode::Online;
        self
    }

    /// Sets the mode explicitly.
    pub fn with_mode(mut self, mode: ConsensusMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns whether configured sources will be queried.
    pub fn is_online(&self) -> bool {
        self.mode == ConsensusMode::Online && !self.sources.is_empty()
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    fn query(&self, source: &dyn ConsensusSource, claim: &str) -> SourceScore {
        let name = source.name().to_string();
        match source.score(claim) {
            Ok(raw) if raw.is_finite() => SourceScore {
                source: name,
                score: clamp_score(raw),
                rationale: format!("Scored by {}", source.name()),
                offline: false,
            },
            Ok(raw) => {
                warn!(source = %name, value = raw, "consensus source returned a non-finite score");
                SourceScore {
                    source: name,
                    score: SOURCE_FLOOR_SCORE,
                    rationale: format!("Source returned non-finite score {raw}"),
                    offline: false,
                }
            }
            Err(err) => {
                warn!(source = %name, error = %err, "consensus source failed");
                SourceScore {
                    source: name,
                    score: SOURCE_FLOOR_SCORE,
                    rationale: format!("Source error: {err}"),
                    offline: false,
                }
            }
        }
    }
}

impl std::fmt::Debug for MultiSourceScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|source| source.name()).collect();
        f.debug_struct("MultiSourceScorer")
            .field("mode", &self.mode)
            .field("sources", &names)
            .finish()
    }
}

impl ConsensusScorer for MultiSourceScorer {
    fn evaluate(&self, claim: &str) -> ConsensusResult {
        if !self.is_online() {
            return self.heuristic.evaluate(claim);
        }
        let results: Vec<SourceScore> = self
            .sources
            .iter()
            .map(|source| self.query(source.as_ref(), claim))
            .collect();
        debug!(sources = results.len(), "aggregated consensus sources");
        compute_consensus(results, false)
    }
}
