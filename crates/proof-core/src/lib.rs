#![deny(missing_docs)]
#![doc = "Core data model and shared helpers for the ProofCore evaluation pipeline."]

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod hash;
pub mod rng;
pub mod serde_io;

pub use errors::{ErrorInfo, ProofError};
pub use hash::stable_hash_string;
pub use rng::{derive_substream_seed, substream_for_label, RngHandle};
pub use serde_io::{from_json_slice, to_canonical_json_bytes};

/// Identifier of a proof step. Proofs may number their steps or label them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    /// Integer identifier such as `3`.
    Index(i64),
    /// Free-form label such as `"lemma-a"`.
    Label(String),
}

impl StepId {
    /// Returns whether this identifier names the step number `number`.
    ///
    /// Labels match when their trimmed text is exactly the decimal number.
    pub fn matches_number(&self, number: u64) -> bool {
        match self {
            StepId::Index(value) => u64::try_from(*value).map_or(false, |v| v == number),
            StepId::Label(label) => label.trim() == number.to_string(),
        }
    }
}

impl Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Index(value) => write!(f, "{value}"),
            StepId::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<i64> for StepId {
    fn from(value: i64) -> Self {
        StepId::Index(value)
    }
}

impl From<i32> for StepId {
    fn from(value: i32) -> Self {
        StepId::Index(i64::from(value))
    }
}

impl From<u32> for StepId {
    fn from(value: u32) -> Self {
        StepId::Index(i64::from(value))
    }
}

impl From<usize> for StepId {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| StepId::Label(value.to_string()), StepId::Index)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        StepId::Label(value.to_string())
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        StepId::Label(value)
    }
}

/// Mathematical domain a proof or step belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Algebraic manipulation.
    #[default]
    Algebra,
    /// Topological arguments.
    Topology,
    /// Propositional and predicate logic.
    Logic,
}

impl Domain {
    /// All supported domains in canonical order.
    pub const ALL: [Domain; 3] = [Domain::Algebra, Domain::Topology, Domain::Logic];

    /// Returns the lowercase tag used in serialized payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Algebra => "algebra",
            Domain::Topology => "topology",
            Domain::Logic => "logic",
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ProofError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "algebra" => Ok(Domain::Algebra),
            "topology" => Ok(Domain::Topology),
            "logic" => Ok(Domain::Logic),
            other => Err(ProofError::Serde(
                ErrorInfo::new("unknown-domain", "domain must be algebra, topology or logic")
                    .with_context("domain", other),
            )),
        }
    }
}

/// Equation attached to a step, compared side by side by a symbolic verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// Left-hand side expression.
    pub lhs: String,
    /// Right-hand side expression.
    pub rhs: String,
}

impl Equation {
    /// Creates an equation from both sides.
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }
}

/// Single claimed step of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Identifier, unique within the proof.
    pub id: StepId,
    /// Natural-language claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    /// Optional equation checked symbolically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<Equation>,
    /// Domain tag; the proof domain applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    /// Explicit identifiers of the steps this one relies on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<StepId>,
}

impl ProofStep {
    /// Creates a bare step with only an identifier.
    pub fn new(id: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            claim: None,
            equation: None,
            domain: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the claim text.
    pub fn with_claim(mut self, claim: impl Into<String>) -> Self {
        self.claim = Some(claim.into());
        self
    }

    /// Attaches an equation.
    pub fn with_equation(mut self, lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        self.equation = Some(Equation::new(lhs, rhs));
        self
    }

    /// Sets the domain tag.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Appends an explicit dependency.
    pub fn depends_on(mut self, dependency: impl Into<StepId>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Returns the claim text or the empty string.
    pub fn claim_text(&self) -> &str {
        self.claim.as_deref().unwrap_or("")
    }
}

/// Proof submitted for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProofInput {
    /// Ordered steps.
    pub steps: Vec<ProofStep>,
    /// Proof-level domain, defaulting to algebra.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    /// Optional full proof text kept alongside the structured steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ProofInput {
    /// Creates a proof from its steps in the given domain.
    pub fn new(steps: Vec<ProofStep>, domain: Domain) -> Self {
        Self {
            steps,
            domain: Some(domain),
            text: None,
        }
    }

    /// Returns the effective proof domain.
    pub fn domain(&self) -> Domain {
        self.domain.unwrap_or_default()
    }
}
