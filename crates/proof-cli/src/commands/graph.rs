use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use proof_engine::ProofOrchestrator;
use proof_graph::{GraphAnalyzer, GraphResult, GraphView};
use serde::Serialize;

use crate::{load_proof, write_json};

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Proof file (JSON, or YAML by extension).
    #[arg(long)]
    pub proof: PathBuf,
    /// Write the analysis here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct GraphOutput {
    analysis: GraphResult,
    view: GraphView,
}

pub fn run(args: &GraphArgs) -> Result<(), Box<dyn Error>> {
    let proof = load_proof(&args.proof)?;
    let steps = ProofOrchestrator::new()?.resolve_steps(&proof.steps);
    let analysis = GraphAnalyzer::new().analyze(&steps);
    let view = GraphView::build(&steps, &analysis);
    write_json(args.out.as_deref(), &GraphOutput { analysis, view })
}
