use std::collections::BTreeSet;

use proof_core::StepId;
use serde::{Deserialize, Serialize};

/// Category of a structural error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A step transitively depends on itself.
    Circular,
}

/// Severity attached to a structural error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The proof cannot be accepted while the error stands.
    Critical,
}

/// One detected back edge, reported as a closed cycle path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleError {
    /// Node at which the cycle starts.
    pub step_id: StepId,
    /// Error category.
    pub kind: ErrorKind,
    /// Error severity.
    pub severity: Severity,
    /// Closed path, first and last entries are the same node.
    pub path: Vec<StepId>,
    /// Human readable description.
    pub message: String,
}

impl CycleError {
    pub(crate) fn circular(path: Vec<StepId>) -> Self {
        let rendered = path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        Self {
            step_id: path.first().cloned().unwrap_or(StepId::Index(0)),
            kind: ErrorKind::Circular,
            severity: Severity::Critical,
            message: format!("Circular reasoning detected: {rendered}"),
            path,
        }
    }
}

/// Derivation depth of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDepth {
    /// Step identifier.
    pub id: StepId,
    /// Length in nodes of the longest dependency chain ending at the step.
    pub depth: usize,
}

/// Structural metrics for a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraphResult {
    /// Maximum derivation depth in nodes; 0 only for an empty proof.
    pub depth: usize,
    /// Number of detected cycles.
    pub cycles: usize,
    /// One record per detected cycle.
    pub errors: Vec<CycleError>,
    /// Number of nodes with at least three distinct dependents.
    pub bottlenecks: usize,
    /// Longest dependency chain; empty when the graph is cyclic.
    pub critical_path: Vec<StepId>,
    /// Dependencies-first ordering; `None` when the graph is cyclic.
    pub topological_order: Option<Vec<StepId>>,
    /// Depth of every step in submission order.
    pub step_depths: Vec<StepDepth>,
}

impl GraphResult {
    /// Returns whether no cycle was detected.
    pub fn is_acyclic(&self) -> bool {
        self.cycles == 0
    }

    /// Returns every node that lies on a detected cycle.
    pub fn cycle_members(&self) -> BTreeSet<&StepId> {
        self.errors
            .iter()
            .flat_map(|error| error.path.iter())
            .collect()
    }

    /// Returns the recorded depth of a step, or 0 for unknown identifiers.
    pub fn depth_of(&self, id: &StepId) -> usize {
        self.step_depths
            .iter()
            .find(|entry| &entry.id == id)
            .map_or(0, |entry| entry.depth)
    }
}
