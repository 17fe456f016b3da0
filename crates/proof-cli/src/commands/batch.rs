use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use proof_engine::{
    evaluate_batch, load_cases, write_report_json, write_rows_csv, BatchOpts, PerformanceTracker,
    ProofOrchestrator,
};
use tracing::info;

use crate::ConfigArgs;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON array of cases with `id`, optional `expected_valid` and proof fields.
    #[arg(long)]
    pub dataset: PathBuf,
    /// Output directory for `batch_report.json` and `batch_rows.csv`.
    #[arg(long)]
    pub out: PathBuf,
    /// Proofs evaluated in parallel.
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &BatchArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let cases = load_cases(&args.dataset)?;
    let opts = BatchOpts {
        concurrency: args.concurrency,
    };
    let mut tracker = PerformanceTracker::new();
    let report = evaluate_batch(&cases, &opts, &mut tracker, || {
        Ok(ProofOrchestrator::new()?.with_verifier(args.config.verifier()))
    })?;

    write_report_json(&report, &args.out.join("batch_report.json"))?;
    write_rows_csv(&report.rows, &args.out.join("batch_rows.csv"))?;
    info!(
        cases = report.summary.total,
        accuracy = report.summary.accuracy,
        ci95_low = report.summary.accuracy_ci95_low,
        out = %args.out.display(),
        "batch reports written"
    );
    Ok(())
}
