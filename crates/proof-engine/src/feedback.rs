//! Human readable feedback for steps and whole proofs.

use proof_core::StepId;
use serde::{Deserialize, Serialize};

/// Coherence a valid step needs for unqualified success.
pub const STEP_COHERENCE_GATE: u32 = 70;
/// Proof index at or above which the summary is a success.
pub const SUMMARY_SUCCESS_INDEX: u32 = 80;
/// Proof index at or above which the summary is a warning.
pub const SUMMARY_WARNING_INDEX: u32 = 60;

/// Severity of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// Nothing to act on.
    Success,
    /// Worth a second look.
    Warning,
    /// Must be fixed.
    Error,
}

/// What a message is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTarget {
    /// A single step.
    Step(StepId),
    /// The proof as a whole.
    Proof,
    /// The dependency structure.
    GraphAnalysis,
}

/// One feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Subject of the message.
    pub target: FeedbackTarget,
    /// Severity.
    pub kind: FeedbackKind,
    /// One-line summary.
    pub summary: String,
    /// Supporting diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Produces step and proof level messages.
pub trait FeedbackGenerator: Send + Sync {
    /// Message for one verified step.
    fn step_feedback(
        &self,
        step_id: &StepId,
        valid: bool,
        coherence: u32,
        diagnostics: &[String],
    ) -> FeedbackMessage;

    /// Summary for the whole proof.
    fn proof_summary(&self, passed: usize, total: usize, index: u32) -> FeedbackMessage;
}

/// Fixed-template generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFeedbackGenerator;

impl FeedbackGenerator for TemplateFeedbackGenerator {
    fn step_feedback(
        &self,
        step_id: &StepId,
        valid: bool,
        coherence: u32,
        diagnostics: &[String],
    ) -> FeedbackMessage {
        let (kind, summary) = match (valid, coherence >= STEP_COHERENCE_GATE) {
            (true, true) => (
                FeedbackKind::Success,
                format!("Step {step_id} is valid (coherence {coherence})"),
            ),
            (true, false) => (
                FeedbackKind::Warning,
                format!("Step {step_id} is valid but coherence is low ({coherence})"),
            ),
            (false, _) => (
                FeedbackKind::Error,
                format!("Step {step_id} could not be verified"),
            ),
        };
        FeedbackMessage {
            target: FeedbackTarget::Step(step_id.clone()),
            kind,
            summary,
            details: diagnostics.to_vec(),
        }
    }

    fn proof_summary(&self, passed: usize, total: usize, index: u32) -> FeedbackMessage {
        let kind = if index >= SUMMARY_SUCCESS_INDEX {
            FeedbackKind::Success
        } else if index >= SUMMARY_WARNING_INDEX {
            FeedbackKind::Warning
        } else {
            FeedbackKind::Error
        };
        FeedbackMessage {
            target: FeedbackTarget::Proof,
            kind,
            summary: format!("{passed}/{total} steps passed, logic integrity index {index}"),
            details: Vec::new(),
        }
    }
}

pub(crate) fn cycle_error(cycles: usize, paths: Vec<String>) -> FeedbackMessage {
    FeedbackMessage {
        target: FeedbackTarget::GraphAnalysis,
        kind: FeedbackKind::Error,
        summary: format!("Circular reasoning detected: {cycles} cycle(s) found in proof structure"),
        details: paths,
    }
}

pub(crate) fn bottleneck_warning(bottlenecks: usize) -> FeedbackMessage {
    FeedbackMessage {
        target: FeedbackTarget::GraphAnalysis,
        kind: FeedbackKind::Warning,
        summary: format!(
            "{bottlenecks} bottleneck(s) found: consider breaking dependency chains"
        ),
        details: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_kinds_follow_validity_then_coherence() {
        let generator = TemplateFeedbackGenerator;
        let id = StepId::Index(1);
        assert_eq!(generator.step_feedback(&id, true, 70, &[]).kind, FeedbackKind::Success);
        assert_eq!(generator.step_feedback(&id, true, 69, &[]).kind, FeedbackKind::Warning);
        assert_eq!(generator.step_feedback(&id, false, 100, &[]).kind, FeedbackKind::Error);
    }

    #[test]
    fn summary_thresholds() {
        let generator = TemplateFeedbackGenerator;
        assert_eq!(generator.proof_summary(2, 2, 80).kind, FeedbackKind::Success);
        assert_eq!(generator.proof_summary(1, 2, 60).kind, FeedbackKind::Warning);
        assert_eq!(generator.proof_summary(0, 2, 59).kind, FeedbackKind::Error);
    }

    #[test]
    fn diagnostics_are_carried() {
        let message = TemplateFeedbackGenerator.step_feedback(
            &StepId::from("lemma"),
            false,
            50,
            &["parse failure".to_string()],
        );
        assert_eq!(message.details, vec!["parse failure".to_string()]);
        assert_eq!(message.target, FeedbackTarget::Step(StepId::from("lemma")));
    }
}
