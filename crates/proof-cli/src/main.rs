use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args as ClapArgs, Parser, Subcommand};
use proof_core::{to_canonical_json_bytes, ProofInput};
use proof_hybrid::{
    FallbackPolicy, FileConfigSource, HybridVerifier, StaticConfigSource,
};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{batch::BatchArgs, evaluate::EvaluateArgs, graph::GraphArgs, score::ScoreArgs};

const DEFAULT_FILTER: &str = "warn,proofcore=info,proof_engine=info";
const VERBOSE_FILTER: &str = "debug";

#[derive(Parser, Debug)]
#[command(name = "proofcore", about = "Proof structure analysis and scoring")]
struct Cli {
    /// Emit debug logs on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a proof and print the full result.
    Evaluate(EvaluateArgs),
    /// Analyze only the dependency structure of a proof.
    Graph(GraphArgs),
    /// Score a single claim with the offline heuristic.
    Score(ScoreArgs),
    /// Evaluate a labelled dataset and write JSON and CSV reports.
    Batch(BatchArgs),
}

/// Verification weighting options shared by commands that verify steps.
#[derive(ClapArgs, Debug, Clone)]
pub struct ConfigArgs {
    /// YAML, TOML or JSON file with symbolic_weight, semantic_weight and pass_threshold.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Fail instead of falling back to default weights when the config cannot be read.
    #[arg(long)]
    pub strict_config: bool,
}

impl ConfigArgs {
    pub fn verifier(&self) -> HybridVerifier {
        let policy = if self.strict_config {
            FallbackPolicy::Fail
        } else {
            FallbackPolicy::UseDefaults
        };
        let verifier = HybridVerifier::new().with_fallback_policy(policy);
        match &self.config {
            Some(path) => verifier.with_config_source(FileConfigSource::new(path)),
            None => verifier.with_config_source(StaticConfigSource::default()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let started = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Evaluate(args) => commands::evaluate::run(&args, started),
        Command::Graph(args) => commands::graph::run(&args),
        Command::Score(args) => commands::score::run(&args),
        Command::Batch(args) => commands::batch::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads a proof from JSON, or YAML when the extension says so.
pub fn load_proof(path: &Path) -> Result<ProofInput, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let proof = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    Ok(proof)
}

/// Writes canonical JSON to `out`, or to stdout followed by a newline.
pub fn write_json<T: serde::Serialize>(out: Option<&Path>, value: &T) -> Result<(), Box<dyn Error>> {
    let bytes = to_canonical_json_bytes(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
