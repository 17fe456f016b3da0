//! Latency tracking against fixed performance gates.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Latency target checked at a percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGate {
    /// Target in milliseconds.
    pub target_ms: f64,
    /// Percentile the target applies to, `100` meaning the maximum.
    pub percentile: f64,
}

/// First evaluation of a fresh process.
pub const COLD_BOOT_GATE: PerformanceGate = PerformanceGate {
    target_ms: 3500.0,
    percentile: 100.0,
};
/// Single proof evaluation on a warm process.
pub const WARM_VERIFY_GATE: PerformanceGate = PerformanceGate {
    target_ms: 300.0,
    percentile: 95.0,
};
/// One batch run.
pub const BATCH_GATE: PerformanceGate = PerformanceGate {
    target_ms: 500.0,
    percentile: 95.0,
};

const WARM_LOG_EVERY: usize = 10;

/// Pass flags per gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStatus {
    /// Cold boot within target.
    pub cold_boot_pass: bool,
    /// Warm verification p95 within target.
    pub warm_verify_pass: bool,
    /// Batch p95 within target.
    pub batch_pass: bool,
}

/// Snapshot of recorded latencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Cold boot latency.
    pub cold_boot_ms: Option<f64>,
    /// 95th percentile of warm verifications.
    pub warm_verify_p95_ms: Option<f64>,
    /// Number of warm verification samples.
    pub warm_verify_samples: usize,
    /// 95th percentile of batch runs.
    pub batch_p95_ms: Option<f64>,
    /// Per-gate results.
    pub gates: GateStatus,
    /// Whether every gate passed.
    pub overall_pass: bool,
}

/// Summary statistics of warm verifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Fastest sample.
    pub min_ms: f64,
    /// Slowest sample.
    pub max_ms: f64,
    /// Arithmetic mean.
    pub mean_ms: f64,
    /// 95th percentile.
    pub p95_ms: f64,
    /// Sample count.
    pub samples: usize,
}

/// Records latencies for one process or session.
#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    cold_boot_ms: Option<f64>,
    warm_verify_ms: Vec<f64>,
    batch_ms: Vec<f64>,
}

/// Nearest-rank percentile: `sorted[ceil(p / 100 * n) - 1]`. Empty input gives `None`.
pub fn percentile(values: &[f64], percentile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (percentile / 100.0 * sorted.len() as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len() - 1);
    Some(sorted[index])
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

impl PerformanceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the cold boot latency, replacing any earlier value.
    pub fn record_cold_boot(&mut self, elapsed: Duration) {
        let ms = millis(elapsed);
        self.cold_boot_ms = Some(ms);
        info!(ms, pass = ms <= COLD_BOOT_GATE.target_ms, "cold boot recorded");
    }

    /// Records one warm verification.
    pub fn record_warm_verify(&mut self, elapsed: Duration) {
        self.warm_verify_ms.push(millis(elapsed));
        if self.warm_verify_ms.len() % WARM_LOG_EVERY == 0 {
            debug!(
                p95 = ?self.warm_verify_p95(),
                samples = self.warm_verify_ms.len(),
                "warm verify latency"
            );
        }
    }

    /// Records one batch run over `proofs` proofs.
    pub fn record_batch(&mut self, elapsed: Duration, proofs: usize) {
        let ms = millis(elapsed);
        self.batch_ms.push(ms);
        info!(ms, proofs, per_proof = ms / proofs.max(1) as f64, "batch recorded");
    }

    /// 95th percentile of warm verifications.
    pub fn warm_verify_p95(&self) -> Option<f64> {
        percentile(&self.warm_verify_ms, WARM_VERIFY_GATE.percentile)
    }

    /// Warm verification statistics, if any were recorded.
    pub fn warm_verify_stats(&self) -> Option<LatencyStats> {
        let p95 = self.warm_verify_p95()?;
        let samples = self.warm_verify_ms.len();
        let min = self.warm_verify_ms.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.warm_verify_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(LatencyStats {
            min_ms: min,
            max_ms: max,
            mean_ms: self.warm_verify_ms.iter().sum::<f64>() / samples as f64,
            p95_ms: p95,
            samples,
        })
    }

    /// Builds the gate report. A gate without samples fails.
    pub fn report(&self) -> PerformanceReport {
        let warm = self.warm_verify_p95();
        let batch = percentile(&self.batch_ms, BATCH_GATE.percentile);
        let within = |value: Option<f64>, gate: PerformanceGate| {
            value.map_or(false, |ms| ms <= gate.target_ms)
        };
        let gates = GateStatus {
            cold_boot_pass: within(self.cold_boot_ms, COLD_BOOT_GATE),
            warm_verify_pass: within(warm, WARM_VERIFY_GATE),
            batch_pass: within(batch, BATCH_GATE),
        };
        PerformanceReport {
            cold_boot_ms: self.cold_boot_ms,
            warm_verify_p95_ms: warm,
            warm_verify_samples: self.warm_verify_ms.len(),
            batch_p95_ms: batch,
            overall_pass: gates.cold_boot_pass && gates.warm_verify_pass && gates.batch_pass,
            gates,
        }
    }

    /// Clears all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
