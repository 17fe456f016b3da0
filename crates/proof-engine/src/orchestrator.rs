use proof_core::{stable_hash_string, Domain, ProofError, ProofInput, ProofStep, StepId};
use proof_graph::{CycleError, GraphAnalyzer, GraphView};
use proof_hybrid::{ConfidenceIndexEngine, ConfigOrigin, HybridStepResult, HybridVerifier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extract::{resolve_dependencies, DependencyExtractor, RegexDependencyExtractor};
use crate::feedback::{
    bottleneck_warning, cycle_error, FeedbackGenerator, FeedbackMessage, TemplateFeedbackGenerator,
};

/// Index points removed per detected cycle.
pub const CYCLE_PENALTY: u32 = 15;
/// Index a proof needs to be accepted.
pub const VALID_INDEX: u32 = 80;

/// Full evaluation of one proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofEvaluationResult {
    /// Accepted when the index reaches [`VALID_INDEX`] and no cycle exists.
    pub valid: bool,
    /// Domain the aggregate index was computed in.
    pub domain: Domain,
    /// Aggregate logic integrity index after the cycle penalty.
    pub lii: u32,
    /// Confidence interval around [`Self::lii`].
    pub lci: [u32; 2],
    /// Mean step coherence, rounded.
    pub coherence: u32,
    /// Maximum derivation depth.
    pub depth: usize,
    /// Number of detected cycles.
    pub cycles: usize,
    /// Number of bottleneck steps.
    pub bottlenecks: usize,
    /// Longest dependency chain, empty when cyclic.
    pub critical_path: Vec<StepId>,
    /// Per-step verification in submission order.
    pub steps: Vec<HybridStepResult>,
    /// Step messages, the proof summary, then structural messages.
    pub feedback: Vec<FeedbackMessage>,
    /// Visualization payload.
    pub graph: GraphView,
    /// Structural errors.
    pub graph_errors: Vec<CycleError>,
    /// Origin of the weighting configuration.
    pub config_origin: ConfigOrigin,
    /// SHA-256 over the canonical JSON of the result with this field empty.
    pub analysis_hash: String,
}

/// Runs graph analysis, per-step verification and aggregate scoring.
///
/// Steps are verified sequentially in submission order. The orchestrator owns
/// its verifier, so the weighting configuration is fetched once per instance.
pub struct ProofOrchestrator {
    analyzer: GraphAnalyzer,
    verifier: HybridVerifier,
    extractor: Box<dyn DependencyExtractor>,
    feedback: Box<dyn FeedbackGenerator>,
    engine: ConfidenceIndexEngine,
}

impl ProofOrchestrator {
    /// Creates an orchestrator with the default verifier, the regex extractor
    /// and template feedback.
    pub fn new() -> Result<Self, ProofError> {
        Ok(Self {
            analyzer: GraphAnalyzer::new(),
            verifier: HybridVerifier::new(),
            extractor: Box::new(RegexDependencyExtractor::new()?),
            feedback: Box::new(TemplateFeedbackGenerator),
            engine: ConfidenceIndexEngine::new(),
        })
    }

    /// Replaces the hybrid verifier.
    pub fn with_verifier(mut self, verifier: HybridVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Replaces the dependency extractor.
    pub fn with_extractor(mut self, extractor: impl DependencyExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replaces the feedback generator.
    pub fn with_feedback_generator(mut self, generator: impl FeedbackGenerator + 'static) -> Self {
        self.feedback = Box::new(generator);
        self
    }

    /// Steps with explicit and extracted dependencies merged.
    pub fn resolve_steps(&self, steps: &[ProofStep]) -> Vec<ProofStep> {
        steps
            .iter()
            .map(|step| ProofStep {
                dependencies: resolve_dependencies(step, steps, self.extractor.as_ref()),
                ..step.clone()
            })
            .collect()
    }

    /// Evaluates a proof.
    ///
    /// Fails only when the configuration source is unreachable under a strict
    /// fallback policy, or when the result cannot be hashed.
    pub fn evaluate(&mut self, proof: &ProofInput) -> Result<ProofEvaluationResult, ProofError> {
        let domain = proof.domain();
        let (_, config_origin) = self.verifier.ensure_config()?;

        let resolved = self.resolve_steps(&proof.steps);
        let graph = self.analyzer.analyze(&resolved);
        debug!(
            depth = graph.depth,
            cycles = graph.cycles,
            bottlenecks = graph.bottlenecks,
            "graph analysed"
        );

        let mut steps = Vec::with_capacity(proof.steps.len());
        let mut feedback = Vec::with_capacity(proof.steps.len() + 3);
        for step in &proof.steps {
            let result = self.verifier.verify_step(step, domain)?;
            let diagnostics: Vec<String> = result.symbolic.error.iter().cloned().collect();
            feedback.push(self.feedback.step_feedback(
                &result.step_id,
                result.symbolic.valid,
                result.coherence(),
                &diagnostics,
            ));
            steps.push(result);
        }

        let total = steps.len();
        let passed = steps.iter().filter(|result| result.passed).count();
        let mean_coherence = if total == 0 {
            0.0
        } else {
            steps
                .iter()
                .map(|result| f64::from(result.coherence()))
                .sum::<f64>()
                / total as f64
        };

        let aggregate = self
            .engine
            .analyze(domain, total, total - passed, mean_coherence, 0.0);
        let penalty = CYCLE_PENALTY.saturating_mul(u32::try_from(graph.cycles).unwrap_or(u32::MAX));
        let lii = aggregate.index.saturating_sub(penalty);
        let lci = [
            aggregate.low().saturating_sub(penalty),
            aggregate.high().saturating_sub(penalty),
        ];

        feedback.push(self.feedback.proof_summary(passed, total, lii));
        if graph.cycles > 0 {
            let paths = graph.errors.iter().map(|error| error.message.clone()).collect();
            feedback.push(cycle_error(graph.cycles, paths));
        }
        if graph.bottlenecks > 0 {
            feedback.push(bottleneck_warning(graph.bottlenecks));
        }

        let valid = lii >= VALID_INDEX && graph.is_acyclic();
        let view = GraphView::build(&resolved, &graph);
        let mut result = ProofEvaluationResult {
            valid,
            domain,
            lii,
            lci,
            coherence: mean_coherence.round() as u32,
            depth: graph.depth,
            cycles: graph.cycles,
            bottlenecks: graph.bottlenecks,
            critical_path: graph.critical_path,
            steps,
            feedback,
            graph: view,
            graph_errors: graph.errors,
            config_origin,
            analysis_hash: String::new(),
        };
        result.analysis_hash = stable_hash_string(&result)?;
        info!(valid, lii, steps = total, "proof evaluated");
        Ok(result)
    }
}

impl std::fmt::Debug for ProofOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofOrchestrator")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
