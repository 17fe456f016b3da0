#![deny(missing_docs)]
#![doc = "Proof orchestration: dependency extraction, graph analysis, per-step verification, aggregate scoring and feedback."]

pub mod batch;
pub mod extract;
pub mod feedback;
mod orchestrator;
pub mod perf;

pub use batch::{
    evaluate_batch, load_cases, wilson_lower_bound, write_report_json, write_rows_csv, BatchCase,
    BatchOpts, BatchReport, BatchRow, BatchSummary,
};
pub use extract::{resolve_dependencies, DependencyExtractor, Extraction, RegexDependencyExtractor};
pub use feedback::{
    FeedbackGenerator, FeedbackKind, FeedbackMessage, FeedbackTarget, TemplateFeedbackGenerator,
};
pub use orchestrator::{ProofEvaluationResult, ProofOrchestrator, CYCLE_PENALTY, VALID_INDEX};
pub use perf::{PerformanceReport, PerformanceTracker};
