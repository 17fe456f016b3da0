use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use proof_consensus::{ConsensusScorer, HeuristicScorer};

use crate::write_json;

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Claim text to score.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub claim: Option<String>,
    /// Read the claim from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: &ScoreArgs) -> Result<(), Box<dyn Error>> {
    let claim = match (&args.claim, &args.file) {
        (Some(claim), _) => claim.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let result = HeuristicScorer::new().evaluate(claim.trim());
    write_json(None, &result)
}
