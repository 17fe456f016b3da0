#![deny(missing_docs)]
#![doc = "Per-step hybrid verification: symbolic checks, consensus weighting and the logic integrity index."]

pub mod config;
pub mod lii;
pub mod symbolic;
mod verifier;

pub use config::{
    resolve_config, ConfigOrigin, ConfigSource, FallbackPolicy, FileConfigSource,
    StaticConfigSource, UnavailableConfigSource, VerificationConfig,
};
pub use lii::{ConfidenceIndexEngine, LiiResult};
pub use symbolic::{SamplingVerifier, SymbolicVerifier, MAX_EXPRESSION_DEPTH};
pub use verifier::{HybridStepResult, HybridVerifier, SymbolicOutcome, COHERENCE_GATE};
