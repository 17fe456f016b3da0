use proof_core::{ProofStep, StepId};
use serde::{Deserialize, Serialize};

use crate::result::GraphResult;

/// Maximum number of characters kept in a node label before truncation.
pub const LABEL_MAX_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Relationship carried by a visualization edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The source step is used to derive the target step.
    Implies,
}

/// Node of the visualization payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewNode {
    /// Step identifier.
    pub id: StepId,
    /// Claim text truncated to [`LABEL_MAX_CHARS`].
    pub label: String,
    /// Derivation depth of the step.
    pub depth: usize,
    /// Whether the step lies on a detected cycle.
    pub error: bool,
}

/// Edge of the visualization payload, from a dependency to its dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEdge {
    /// Dependency.
    pub source: StepId,
    /// Dependent step.
    pub target: StepId,
    /// Relationship kind.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Graph payload handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraphView {
    /// One node per step.
    pub nodes: Vec<ViewNode>,
    /// One edge per declared dependency.
    pub edges: Vec<ViewEdge>,
}

impl GraphView {
    /// Builds the payload for `steps` using the metrics of a prior analysis.
    pub fn build(steps: &[ProofStep], result: &GraphResult) -> Self {
        let cycle_members = result.cycle_members();
        let nodes = steps
            .iter()
            .map(|step| ViewNode {
                id: step.id.clone(),
                label: node_label(step),
                depth: result.depth_of(&step.id),
                error: cycle_members.contains(&step.id),
            })
            .collect();
        let edges = steps
            .iter()
            .flat_map(|step| {
                step.dependencies.iter().map(move |dependency| ViewEdge {
                    source: dependency.clone(),
                    target: step.id.clone(),
                    kind: EdgeKind::Implies,
                })
            })
            .collect();
        Self { nodes, edges }
    }

    /// Returns the identifiers of nodes flagged as errors.
    pub fn error_nodes(&self) -> Vec<&StepId> {
        self.nodes
            .iter()
            .filter(|node| node.error)
            .map(|node| &node.id)
            .collect()
    }
}

fn node_label(step: &ProofStep) -> String {
    let text = match step.claim.as_deref() {
        Some(claim) if !claim.is_empty() => claim.to_string(),
        _ => step.id.to_string(),
    };
    truncate_label(&text)
}

fn truncate_label(text: &str) -> String {
    if text.chars().count() <= LABEL_MAX_CHARS {
        return text.to_string();
    }
    let mut label: String = text.chars().take(LABEL_MAX_CHARS).collect();
    label.push_str(ELLIPSIS);
    label
}
