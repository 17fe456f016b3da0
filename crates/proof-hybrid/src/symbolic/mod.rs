//! Symbolic equation checking.

mod expr;

use std::collections::{BTreeMap, BTreeSet};

use proof_core::{substream_for_label, Domain, Equation, ErrorInfo, ProofError, RngHandle};
use tracing::debug;

pub use expr::{BinaryOp, Expr, Function, MAX_EXPRESSION_DEPTH};

/// Decides whether both sides of an equation are equal.
pub trait SymbolicVerifier: Send + Sync {
    /// Returns `Ok(true)` when `lhs` and `rhs` are equivalent in `domain`.
    fn verify(&self, equation: &Equation, domain: Domain) -> Result<bool, ProofError>;
}

const DEFAULT_SEED: u64 = 0x5eed_0f_c0de;
const DEFAULT_SAMPLES: usize = 16;
const RELATIVE_TOLERANCE: f64 = 1e-9;
const ABSOLUTE_TOLERANCE: f64 = 1e-9;

/// Checks equivalence numerically at deterministic sample points.
///
/// Each variable draws its values from an RNG substream keyed by its name, so
/// the same equation always sees the same points. Half of the points fall in
/// `[-3, 3]` and half in `(0, 3]`, which keeps square roots and logarithms
/// finite on part of the sample. Points where either side is not finite are
/// skipped; if none remain the equation is undecidable and an error is
/// returned.
#[derive(Debug, Clone, Copy)]
pub struct SamplingVerifier {
    seed: u64,
    samples: usize,
}

impl SamplingVerifier {
    /// Creates a verifier with the default seed and sample count.
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            samples: DEFAULT_SAMPLES,
        }
    }

    /// Overrides the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the number of sample points, minimum one.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    fn sample_points(&self, variables: &BTreeSet<String>) -> Vec<BTreeMap<String, f64>> {
        let mut streams: Vec<(String, RngHandle)> = variables
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    RngHandle::substream(self.seed, substream_for_label(name)),
                )
            })
            .collect();
        (0..self.samples)
            .map(|idx| {
                let (low, high) = if idx % 2 == 0 { (-3.0, 3.0) } else { (0.05, 3.0) };
                streams
                    .iter_mut()
                    .map(|(name, rng)| (name.clone(), rng.uniform(low, high)))
                    .collect()
            })
            .collect()
    }
}

impl Default for SamplingVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn agrees(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs());
    (lhs - rhs).abs() <= ABSOLUTE_TOLERANCE + RELATIVE_TOLERANCE * scale
}

impl SymbolicVerifier for SamplingVerifier {
    fn verify(&self, equation: &Equation, domain: Domain) -> Result<bool, ProofError> {
        let lhs = Expr::parse(&equation.lhs)?;
        let rhs = Expr::parse(&equation.rhs)?;

        let mut variables = BTreeSet::new();
        lhs.variables(&mut variables);
        rhs.variables(&mut variables);

        let mut finite = 0usize;
        for point in self.sample_points(&variables) {
            let (left, right) = (lhs.eval(&point), rhs.eval(&point));
            if !left.is_finite() || !right.is_finite() {
                continue;
            }
            finite += 1;
            if !agrees(left, right) {
                debug!(%domain, lhs = %equation.lhs, rhs = %equation.rhs, "sides disagree at sample");
                return Ok(false);
            }
        }

        if finite == 0 {
            return Err(ProofError::Symbolic(
                ErrorInfo::new("no-finite-sample", "no sample point produced finite values")
                    .with_context("lhs", equation.lhs.clone())
                    .with_context("rhs", equation.rhs.clone()),
            ));
        }
        Ok(true)
    }
}
