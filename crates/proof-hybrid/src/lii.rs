//! Logic integrity index.

use proof_core::Domain;
use serde::{Deserialize, Serialize};

const DRIFT_PENALTY: f64 = 0.5;
const INTERVAL_SCALE: f64 = 20.0;
const INTERVAL_BASE: f64 = 1.5;

/// Index with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiiResult {
    /// Logic integrity index in `[0, 100]`.
    pub index: u32,
    /// Confidence interval `[low, high]` bracketing the index.
    pub interval: [u32; 2],
}

impl LiiResult {
    /// Lower bound of the interval.
    pub fn low(&self) -> u32 {
        self.interval[0]
    }

    /// Upper bound of the interval.
    pub fn high(&self) -> u32 {
        self.interval[1]
    }
}

/// Computes the logic integrity index from error counts, coherence and drift.
///
/// ```text
/// n        = max(step_count, 1)
/// accuracy = 100 * (1 - min(errors / n, 1))
/// raw      = w_acc * accuracy + w_coh * coherence - 0.5 * drift
/// index    = round(clamp(raw, 0, 100))
/// half     = ceil(20 / sqrt(n) * (1.5 - coherence / 100))
/// ```
///
/// The interval is `[index - half, index + half]` clipped to `[0, 100]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceIndexEngine;

impl ConfidenceIndexEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }

    /// Accuracy and coherence weights for a domain.
    pub fn weights(domain: Domain) -> (f64, f64) {
        match domain {
            Domain::Algebra => (0.6, 0.4),
            Domain::Topology => (0.55, 0.45),
            Domain::Logic => (0.65, 0.35),
        }
    }

    /// Scores a proof or a single step.
    pub fn analyze(
        &self,
        domain: Domain,
        step_count: usize,
        error_count: usize,
        coherence: f64,
        drift: f64,
    ) -> LiiResult {
        let n = step_count.max(1) as f64;
        let coherence = sanitize(coherence);
        let drift = sanitize(drift);
        let error_ratio = (error_count as f64 / n).min(1.0);
        let accuracy = 100.0 * (1.0 - error_ratio);

        let (w_acc, w_coh) = Self::weights(domain);
        let raw = w_acc * accuracy + w_coh * coherence - DRIFT_PENALTY * drift;
        let index = raw.clamp(0.0, 100.0).round() as u32;

        let half = (INTERVAL_SCALE / n.sqrt() * (INTERVAL_BASE - coherence / 100.0)).ceil() as u32;
        LiiResult {
            index,
            interval: [index.saturating_sub(half), (index + half).min(100)],
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
