//! Step references recovered from claim text.

use proof_core::{ErrorInfo, ProofError, ProofStep, StepId};
use regex::Regex;
use tracing::debug;

const NUMBERED_PATTERN: &str = r"(?i)\b(?:from|by|using)\s+(?:step\s+)?(\d+)\b";
const RELATIVE_PATTERN: &str = r"(?i)\b(?:from\s+)?(?:the\s+)?(?:above|previous|preceding)\b";

/// References found in a single claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Resolved step identifiers in order of appearance, without duplicates.
    pub references: Vec<StepId>,
    /// Whether the claim points back at an earlier step without naming it.
    pub relative_hint: bool,
}

/// Recovers dependency references from claim text.
pub trait DependencyExtractor: Send + Sync {
    /// Extracts references from `claim`, resolved against `steps`.
    fn extract(&self, claim: &str, steps: &[ProofStep]) -> Extraction;
}

/// Extractor matching phrases such as `from step 2`, `by 3` or `using step 1`.
///
/// Numbers resolve to the step whose identifier is that number; numbers with
/// no such step are dropped. Relative phrases (`the above`, `previous`,
/// `preceding`) only set [`Extraction::relative_hint`].
#[derive(Debug, Clone)]
pub struct RegexDependencyExtractor {
    numbered: Regex,
    relative: Regex,
}

impl RegexDependencyExtractor {
    /// Compiles the reference patterns.
    pub fn new() -> Result<Self, ProofError> {
        Ok(Self {
            numbered: compile(NUMBERED_PATTERN)?,
            relative: compile(RELATIVE_PATTERN)?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, ProofError> {
    Regex::new(pattern).map_err(|err| {
        ProofError::Extraction(
            ErrorInfo::new("invalid-pattern", err.to_string()).with_context("pattern", pattern),
        )
    })
}

impl DependencyExtractor for RegexDependencyExtractor {
    fn extract(&self, claim: &str, steps: &[ProofStep]) -> Extraction {
        let mut references: Vec<StepId> = Vec::new();
        for captures in self.numbered.captures_iter(claim) {
            let Some(number) = captures.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) else {
                continue;
            };
            match steps.iter().find(|step| step.id.matches_number(number)) {
                Some(step) if !references.contains(&step.id) => references.push(step.id.clone()),
                Some(_) => {}
                None => debug!(number, "reference to unknown step ignored"),
            }
        }
        Extraction {
            references,
            relative_hint: self.relative.is_match(claim),
        }
    }
}

/// Explicit dependencies followed by extracted references, deduplicated.
pub fn resolve_dependencies(
    step: &ProofStep,
    steps: &[ProofStep],
    extractor: &dyn DependencyExtractor,
) -> Vec<StepId> {
    let mut merged: Vec<StepId> = Vec::with_capacity(step.dependencies.len());
    let extracted = extractor.extract(step.claim_text(), steps);
    for id in step.dependencies.iter().chain(extracted.references.iter()) {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    merged
}
