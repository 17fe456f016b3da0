//! Verification weights and the sources they are fetched from.

use std::fs;
use std::path::{Path, PathBuf};

use proof_core::{ErrorInfo, ProofError};
use serde::{Deserialize, Serialize};
use tracing::warn;

fn config_error(code: &str, message: impl Into<String>) -> ProofError {
    ProofError::Config(ErrorInfo::new(code, message))
}

/// Weighting applied when combining symbolic and semantic evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Weight of the symbolic outcome, in `[0, 1]`.
    #[serde(default = "VerificationConfig::default_symbolic_weight")]
    pub symbolic_weight: f64,
    /// Weight of the consensus mean, in `[0, 1]`.
    #[serde(default = "VerificationConfig::default_semantic_weight")]
    pub semantic_weight: f64,
    /// Combined score a step needs to pass, in `[0, 100]`.
    #[serde(default = "VerificationConfig::default_pass_threshold")]
    pub pass_threshold: f64,
}

impl VerificationConfig {
    const fn default_symbolic_weight() -> f64 {
        0.7
    }

    const fn default_semantic_weight() -> f64 {
        0.3
    }

    const fn default_pass_threshold() -> f64 {
        70.0
    }

    /// Checks that weights and threshold are finite and in range.
    pub fn validate(&self) -> Result<(), ProofError> {
        for (name, value) in [
            ("symbolic_weight", self.symbolic_weight),
            ("semantic_weight", self.semantic_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ProofError::Config(
                    ErrorInfo::new("invalid-weight", "weights must lie in [0, 1]")
                        .with_context("field", name)
                        .with_context("value", value.to_string()),
                ));
            }
        }
        if !self.pass_threshold.is_finite() || !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(ProofError::Config(
                ErrorInfo::new("invalid-threshold", "pass_threshold must lie in [0, 100]")
                    .with_context("value", self.pass_threshold.to_string()),
            ));
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            symbolic_weight: Self::default_symbolic_weight(),
            semantic_weight: Self::default_semantic_weight(),
            pass_threshold: Self::default_pass_threshold(),
        }
    }
}

/// Provider of a [`VerificationConfig`].
pub trait ConfigSource: Send + Sync {
    /// Short description used in logs and in [`ConfigOrigin`].
    fn describe(&self) -> String;

    /// Fetches the configuration. Validation happens in [`resolve_config`].
    fn fetch(&self) -> Result<VerificationConfig, ProofError>;
}

/// Source that hands out a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfigSource {
    config: VerificationConfig,
}

impl StaticConfigSource {
    /// Wraps `config`.
    pub fn new(config: VerificationConfig) -> Self {
        Self { config }
    }
}

impl ConfigSource for StaticConfigSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    fn fetch(&self) -> Result<VerificationConfig, ProofError> {
        Ok(self.config)
    }
}

/// Source reading YAML, TOML or JSON from disk, chosen by file extension.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    /// Creates a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self) -> Result<VerificationConfig, ProofError> {
        let display = self.path.display().to_string();
        let contents =
            fs::read_to_string(&self.path).map_err(|err| ProofError::io(display.clone(), &err))?;
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let parsed = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|err| err.to_string()),
            "toml" => toml::from_str(&contents).map_err(|err| err.to_string()),
            "json" => serde_json::from_str(&contents).map_err(|err| err.to_string()),
            other => {
                return Err(ProofError::Config(
                    ErrorInfo::new("unsupported-format", "config files must be yaml, toml or json")
                        .with_context("path", display)
                        .with_context("extension", other),
                ))
            }
        };
        parsed.map_err(|message| {
            ProofError::Config(ErrorInfo::new("parse-config", message).with_context("path", display))
        })
    }
}

/// Source that always fails, standing in for an unreachable endpoint.
#[derive(Debug, Clone, Default)]
pub struct UnavailableConfigSource {
    reason: String,
}

impl UnavailableConfigSource {
    /// Creates a source failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ConfigSource for UnavailableConfigSource {
    fn describe(&self) -> String {
        "unavailable".to_string()
    }

    fn fetch(&self) -> Result<VerificationConfig, ProofError> {
        let reason = if self.reason.is_empty() {
            "configuration endpoint unreachable"
        } else {
            self.reason.as_str()
        };
        Err(config_error("source-unavailable", reason))
    }
}

/// What to do when the configuration source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Continue with [`VerificationConfig::default`] and record the fallback.
    #[default]
    UseDefaults,
    /// Return the source error to the caller.
    Fail,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigOrigin {
    /// Fetched and validated from the named source.
    Source {
        /// Source description.
        name: String,
    },
    /// The source failed and defaults are in use.
    Fallback {
        /// Error reported by the source.
        reason: String,
    },
}

impl ConfigOrigin {
    /// Returns whether defaults replaced a failed source.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ConfigOrigin::Fallback { .. })
    }
}

/// Fetches and validates a configuration, applying the fallback policy.
pub fn resolve_config(
    source: &dyn ConfigSource,
    policy: FallbackPolicy,
) -> Result<(VerificationConfig, ConfigOrigin), ProofError> {
    let fetched = source
        .fetch()
        .and_then(|config| config.validate().map(|_| config));
    match fetched {
        Ok(config) => Ok((
            config,
            ConfigOrigin::Source {
                name: source.describe(),
            },
        )),
        Err(err) if policy == FallbackPolicy::UseDefaults => {
            warn!(
                source = %source.describe(),
                error = %err,
                "verification config unavailable, using defaults"
            );
            Ok((
                VerificationConfig::default(),
                ConfigOrigin::Fallback {
                    reason: err.to_string(),
                },
            ))
        }
        Err(err) => Err(err),
    }
}
