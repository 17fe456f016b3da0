use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use proof_engine::{PerformanceTracker, ProofOrchestrator};
use tracing::{info, warn};

use crate::{load_proof, write_json, ConfigArgs};

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Proof file (JSON, or YAML by extension).
    #[arg(long)]
    pub proof: PathBuf,
    /// Write the result here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &EvaluateArgs, started: Instant) -> Result<(), Box<dyn Error>> {
    let proof = load_proof(&args.proof)?;
    let mut orchestrator = ProofOrchestrator::new()?.with_verifier(args.config.verifier());

    let evaluation_started = Instant::now();
    let result = orchestrator.evaluate(&proof)?;
    let mut tracker = PerformanceTracker::new();
    tracker.record_warm_verify(evaluation_started.elapsed());
    tracker.record_cold_boot(started.elapsed());

    if result.config_origin.is_fallback() {
        warn!(origin = ?result.config_origin, "evaluated with default weights");
    }
    info!(
        valid = result.valid,
        lii = result.lii,
        cycles = result.cycles,
        hash = %result.analysis_hash,
        "evaluation complete"
    );
    write_json(args.out.as_deref(), &result)
}
