use proof_consensus::{
    ConsensusMode, ConsensusScorer, ConsensusSource, HeuristicScorer, HeuristicSource,
    MultiSourceScorer, SOURCE_FLOOR_SCORE,
};
use proof_core::{ErrorInfo, ProofError};

struct Fixed(&'static str, f64);

impl ConsensusSource for Fixed {
    fn name(&self) -> &str {
        self.0
    }

    fn score(&self, _claim: &str) -> Result<f64, ProofError> {
        Ok(self.1)
    }
}

struct Failing;

impl ConsensusSource for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn score(&self, _claim: &str) -> Result<f64, ProofError> {
        Err(ProofError::Consensus(ErrorInfo::new("unreachable", "source offline")))
    }
}

#[test]
fn sources_are_ignored_unless_switched_online() {
    let claim = "Thus a + b = b + a";
    let scorer = MultiSourceScorer::new().with_source(Fixed("a", 10.0));
    assert!(!scorer.is_online());
    assert_eq!(scorer.evaluate(claim), HeuristicScorer::new().evaluate(claim));
}

#[test]
fn online_without_sources_stays_offline() {
    let scorer = MultiSourceScorer::new().online();
    assert!(!scorer.is_online());
    assert!(scorer.evaluate("Hence the claim holds").offline_mode);
}

#[test]
fn online_sources_are_aggregated() {
    let scorer = MultiSourceScorer::new()
        .with_mode(ConsensusMode::Online)
        .with_source(Fixed("a", 76.0))
        .with_source(Fixed("b", 80.0));
    let result = scorer.evaluate("claim text here");
    assert!(!result.offline_mode);
    assert_eq!(result.mean, 78);
    assert_eq!(result.variance, 4.0);
    assert_eq!(result.coherence, 96);
}

#[test]
fn failing_source_falls_back_to_floor() {
    let scorer = MultiSourceScorer::new()
        .online()
        .with_source(Failing)
        .with_source(Fixed("nan", f64::NAN))
        .with_source(Fixed("good", 90.0));
    let result = scorer.evaluate("claim text here");
    assert_eq!(result.results.len(), 3);
    assert_eq!(result.results[0].score, SOURCE_FLOOR_SCORE);
    assert!(result.results[0].rationale.contains("source offline"));
    assert_eq!(result.results[1].score, SOURCE_FLOOR_SCORE);
    assert_eq!(result.results[2].score, 90);
    assert!(result.coherence <= 100);
}

#[test]
fn heuristic_source_matches_offline_score() {
    let claim = "Because x = 1, x + 1 = 2";
    let scorer = MultiSourceScorer::new().online().with_source(HeuristicSource::default());
    let result = scorer.evaluate(claim);
    assert_eq!(result.mean, HeuristicScorer::new().score(claim));
    assert_eq!(result.coherence, 100);
}

#[test]
fn results_serialize_with_stable_fields() {
    let result = HeuristicScorer::new().evaluate("Therefore x = 1");
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["offline_mode"], true);
    assert_eq!(value["results"][0]["source"], "offline-heuristic");
}
