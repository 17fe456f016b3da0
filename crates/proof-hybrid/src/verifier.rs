use proof_consensus::{ConsensusResult, ConsensusScorer, HeuristicScorer};
use proof_core::{Domain, ProofError, ProofStep, StepId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{
    resolve_config, ConfigOrigin, ConfigSource, FallbackPolicy, StaticConfigSource,
    VerificationConfig,
};
use crate::lii::{ConfidenceIndexEngine, LiiResult};
use crate::symbolic::{SamplingVerifier, SymbolicVerifier};

/// Minimum consensus coherence for a step to pass.
pub const COHERENCE_GATE: u32 = 70;

const SYMBOLIC_PASS: f64 = 100.0;

/// Outcome of the symbolic check of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicOutcome {
    /// Whether the equation holds, or `true` for steps without one.
    pub valid: bool,
    /// Whether a verifier actually ran.
    pub checked: bool,
    /// Verifier error text when the check could not be completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolicOutcome {
    fn unchecked() -> Self {
        Self {
            valid: true,
            checked: false,
            error: None,
        }
    }
}

/// Verification result for a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridStepResult {
    /// Step identifier.
    pub step_id: StepId,
    /// Domain the step was verified in.
    pub domain: Domain,
    /// Symbolic check outcome.
    pub symbolic: SymbolicOutcome,
    /// Consensus over the claim text.
    pub consensus: ConsensusResult,
    /// Weighted combination of symbolic and semantic evidence.
    pub combined_score: f64,
    /// Per-step logic integrity index.
    pub lii: LiiResult,
    /// Whether the step meets the threshold and coherence gate.
    pub passed: bool,
}

impl HybridStepResult {
    /// Consensus coherence of the step.
    pub fn coherence(&self) -> u32 {
        self.consensus.coherence
    }
}

/// Combines a symbolic verifier with consensus scoring, step by step.
///
/// The weighting configuration is fetched from the configured source on first
/// use and kept for the lifetime of the instance.
pub struct HybridVerifier {
    source: Box<dyn ConfigSource>,
    policy: FallbackPolicy,
    resolved: Option<(VerificationConfig, ConfigOrigin)>,
    symbolic: Box<dyn SymbolicVerifier>,
    consensus: Box<dyn ConsensusScorer>,
    engine: ConfidenceIndexEngine,
}

impl HybridVerifier {
    /// Creates a verifier with default weights, the sampling verifier and the
    /// offline heuristic.
    pub fn new() -> Self {
        Self {
            source: Box::new(StaticConfigSource::default()),
            policy: FallbackPolicy::default(),
            resolved: None,
            symbolic: Box::new(SamplingVerifier::new()),
            consensus: Box::new(HeuristicScorer::new()),
            engine: ConfidenceIndexEngine::new(),
        }
    }

    /// Replaces the configuration source.
    pub fn with_config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Box::new(source);
        self.resolved = None;
        self
    }

    /// Sets the behaviour when the configuration source fails.
    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the symbolic verifier.
    pub fn with_symbolic_verifier(mut self, verifier: impl SymbolicVerifier + 'static) -> Self {
        self.symbolic = Box::new(verifier);
        self
    }

    /// Replaces the consensus scorer.
    pub fn with_consensus_scorer(mut self, scorer: impl ConsensusScorer + 'static) -> Self {
        self.consensus = Box::new(scorer);
        self
    }

    /// Fetches the configuration if it has not been fetched yet and returns
    /// it with its origin.
    pub fn ensure_config(&mut self) -> Result<(VerificationConfig, ConfigOrigin), ProofError> {
        if let Some(resolved) = &self.resolved {
            return Ok(resolved.clone());
        }
        let resolved = resolve_config(self.source.as_ref(), self.policy)?;
        debug!(origin = ?resolved.1, "verification config resolved");
        self.resolved = Some(resolved.clone());
        Ok(resolved)
    }

    /// Origin of the active configuration, once fetched.
    pub fn config_origin(&self) -> Option<&ConfigOrigin> {
        self.resolved.as_ref().map(|(_, origin)| origin)
    }

    /// Verifies one step. `default_domain` applies when the step has none.
    pub fn verify_step(
        &mut self,
        step: &ProofStep,
        default_domain: Domain,
    ) -> Result<HybridStepResult, ProofError> {
        let (config, _) = self.ensure_config()?;
        let domain = step.domain.unwrap_or(default_domain);

        let symbolic = match &step.equation {
            None => SymbolicOutcome::unchecked(),
            Some(equation) => match self.symbolic.verify(equation, domain) {
                Ok(valid) => SymbolicOutcome {
                    valid,
                    checked: true,
                    error: None,
                },
                Err(err) => {
                    warn!(step = %step.id, error = %err, "symbolic verification failed");
                    SymbolicOutcome {
                        valid: false,
                        checked: true,
                        error: Some(err.to_string()),
                    }
                }
            },
        };

        let consensus = self.consensus.evaluate(step.claim_text());
        let symbolic_score = if symbolic.valid { SYMBOLIC_PASS } else { 0.0 };
        let combined_score =
            config.symbolic_weight * symbolic_score + config.semantic_weight * consensus.mean_score();
        let lii = self.engine.analyze(
            domain,
            1,
            usize::from(!symbolic.valid),
            f64::from(consensus.coherence),
            0.0,
        );
        let passed = combined_score >= config.pass_threshold && consensus.coherence >= COHERENCE_GATE;

        debug!(step = %step.id, combined_score, passed, "step verified");
        Ok(HybridStepResult {
            step_id: step.id.clone(),
            domain,
            symbolic,
            consensus,
            combined_score,
            lii,
            passed,
        })
    }
}

impl Default for HybridVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HybridVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridVerifier")
            .field("source", &self.source.describe())
            .field("policy", &self.policy)
            .field("resolved", &self.resolved)
            .finish()
    }
}
