//! Dataset evaluation across many proofs.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use proof_core::{to_canonical_json_bytes, Domain, ErrorInfo, ProofError, ProofInput};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::orchestrator::{ProofEvaluationResult, ProofOrchestrator};
use crate::perf::{PerformanceReport, PerformanceTracker};

/// Normal quantile for a two-sided 95 % interval.
pub const Z_95: f64 = 1.96;

fn batch_error(code: &str, err: impl ToString) -> ProofError {
    ProofError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// One proof of a dataset with its expected verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCase {
    /// Case identifier.
    pub id: String,
    /// Expected validity, when labelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_valid: Option<bool>,
    /// Proof under test.
    #[serde(flatten)]
    pub proof: ProofInput,
}

/// Options for [`evaluate_batch`].
#[derive(Debug, Clone)]
pub struct BatchOpts {
    /// Worker threads; proofs are distributed, steps stay sequential.
    pub concurrency: usize,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Flat per-proof row, suitable for CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    /// Case identifier.
    pub id: String,
    /// Proof domain.
    pub domain: Domain,
    /// Number of steps.
    pub steps: usize,
    /// Verdict.
    pub valid: bool,
    /// Expected verdict, when labelled.
    pub expected_valid: Option<bool>,
    /// Whether the verdict matched the label.
    pub correct: Option<bool>,
    /// Aggregate index.
    pub lii: u32,
    /// Lower interval bound.
    pub lci_low: u32,
    /// Upper interval bound.
    pub lci_high: u32,
    /// Mean coherence.
    pub coherence: u32,
    /// Derivation depth.
    pub depth: usize,
    /// Detected cycles.
    pub cycles: usize,
    /// Content hash of the full evaluation.
    pub analysis_hash: String,
}

impl BatchRow {
    fn new(case: &BatchCase, result: &ProofEvaluationResult) -> Self {
        Self {
            id: case.id.clone(),
            domain: result.domain,
            steps: result.steps.len(),
            valid: result.valid,
            expected_valid: case.expected_valid,
            correct: case.expected_valid.map(|expected| expected == result.valid),
            lii: result.lii,
            lci_low: result.lci[0],
            lci_high: result.lci[1],
            coherence: result.coherence,
            depth: result.depth,
            cycles: result.cycles,
            analysis_hash: result.analysis_hash.clone(),
        }
    }
}

/// Accuracy figures over labelled cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Cases evaluated.
    pub total: usize,
    /// Cases judged valid.
    pub valid: usize,
    /// Cases with an expected verdict.
    pub labelled: usize,
    /// Labelled cases whose verdict matched.
    pub correct: usize,
    /// `correct / labelled`, 0 when nothing is labelled.
    pub accuracy: f64,
    /// Wilson 95 % lower bound of the accuracy.
    pub accuracy_ci95_low: f64,
}

impl BatchSummary {
    fn from_rows(rows: &[BatchRow]) -> Self {
        let labelled = rows.iter().filter(|row| row.correct.is_some()).count();
        let correct = rows.iter().filter(|row| row.correct == Some(true)).count();
        Self {
            total: rows.len(),
            valid: rows.iter().filter(|row| row.valid).count(),
            labelled,
            correct,
            accuracy: if labelled == 0 {
                0.0
            } else {
                correct as f64 / labelled as f64
            },
            accuracy_ci95_low: wilson_lower_bound(correct, labelled, Z_95),
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// One row per case in dataset order.
    pub rows: Vec<BatchRow>,
    /// Accuracy summary.
    pub summary: BatchSummary,
    /// Latency gates after the run.
    pub performance: PerformanceReport,
}

/// Lower bound of the Wilson score interval for `successes` out of `trials`.
pub fn wilson_lower_bound(successes: usize, trials: usize, z: f64) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let n = trials as f64;
    let p_hat = successes as f64 / n;
    let z2 = z * z;
    let denominator = 1.0 + z2 / n;
    let center = p_hat + z2 / (2.0 * n);
    let margin = z * (p_hat * (1.0 - p_hat) / n + z2 / (4.0 * n * n)).sqrt();
    ((center - margin) / denominator).max(0.0)
}

/// Evaluates every case on its own orchestrator built by `factory`.
///
/// Cases run in parallel on a dedicated pool; rows keep dataset order. The
/// first failing case aborts the batch.
pub fn evaluate_batch<F>(
    cases: &[BatchCase],
    opts: &BatchOpts,
    tracker: &mut PerformanceTracker,
    factory: F,
) -> Result<BatchReport, ProofError>
where
    F: Fn() -> Result<ProofOrchestrator, ProofError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency.max(1))
        .build()
        .map_err(|err| batch_error("thread-pool", err))?;

    let started = Instant::now();
    let outcomes: Result<Vec<(BatchRow, Duration)>, ProofError> = pool.install(|| {
        cases
            .par_iter()
            .map(|case| {
                let case_started = Instant::now();
                let mut orchestrator = factory()?;
                let result = orchestrator.evaluate(&case.proof)?;
                Ok((BatchRow::new(case, &result), case_started.elapsed()))
            })
            .collect()
    });
    let outcomes = outcomes?;
    tracker.record_batch(started.elapsed(), cases.len());

    let mut rows = Vec::with_capacity(outcomes.len());
    for (row, elapsed) in outcomes {
        tracker.record_warm_verify(elapsed);
        rows.push(row);
    }
    let summary = BatchSummary::from_rows(&rows);
    info!(
        total = summary.total,
        correct = summary.correct,
        accuracy = summary.accuracy,
        "batch evaluated"
    );
    Ok(BatchReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        rows,
        summary,
        performance: tracker.report(),
    })
}

/// Loads a dataset: a JSON array of cases.
pub fn load_cases(path: &Path) -> Result<Vec<BatchCase>, ProofError> {
    let bytes = fs::read(path).map_err(|err| ProofError::io(path.display().to_string(), &err))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        ProofError::Serde(
            ErrorInfo::new("dataset-parse", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Writes the report as canonical JSON.
pub fn write_report_json(report: &BatchReport, path: &Path) -> Result<(), ProofError> {
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes).map_err(|err| ProofError::io(path.display().to_string(), &err))
}

/// Writes one CSV row per case with a header line.
pub fn write_rows_csv(rows: &[BatchRow], path: &Path) -> Result<(), ProofError> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| {
        ProofError::Io(
            ErrorInfo::new("csv-open", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| batch_error("csv-write", err))?;
    }
    writer.flush().map_err(|err| ProofError::io(path.display().to_string(), &err))
}
