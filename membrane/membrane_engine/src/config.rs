//! Configuration for membranes
//!
//! Handles parsing, defaults and validation of membrane settings.

use membrane_core::id::GraphName;
use membrane_core::LogLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for membrane_core::Error {
    fn from(err: ConfigError) -> Self {
        membrane_core::Error::Config(err.to_string())
    }
}

/// How revocation flags are shared between graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationScope {
    /// One flag per graph. Revoking a graph kills every wrapper that leads
    /// into or out of it.
    #[default]
    Graph,

    /// One flag per unordered pair of graphs.
    Pair,
}

/// Names of the two graphs used by `create_membrane`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNames {
    /// The privileged graph that owns the root value
    #[serde(default = "default_wet")]
    pub wet: GraphName,

    /// The graph that receives wrappers
    #[serde(default = "default_dry")]
    pub dry: GraphName,
}

fn default_wet() -> GraphName {
    GraphName::from("wet")
}

fn default_dry() -> GraphName {
    GraphName::from("dry")
}

impl Default for GraphNames {
    fn default() -> Self {
        Self {
            wet: default_wet(),
            dry: default_dry(),
        }
    }
}

/// Membrane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembraneConfig {
    /// Default graph names
    #[serde(default)]
    pub graphs: GraphNames,

    /// Revocation granularity
    #[serde(default)]
    pub revocation_scope: RevocationScope,

    /// Number of identity map insertions between automatic prune sweeps.
    /// Zero disables automatic pruning.
    #[serde(default = "default_prune_interval")]
    pub prune_interval: usize,

    /// Whether every trap emits a `trace!` event. Takes effect only when
    /// `log_level` is `trace`.
    #[serde(default)]
    pub trace_traps: bool,

    /// Minimum level for membrane lifecycle events
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

fn default_prune_interval() -> usize {
    256
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for MembraneConfig {
    fn default() -> Self {
        Self {
            graphs: GraphNames::default(),
            revocation_scope: RevocationScope::default(),
            prune_interval: default_prune_interval(),
            trace_traps: false,
            log_level: default_log_level(),
        }
    }
}

impl MembraneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MembraneConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graphs.wet.as_str().is_empty() || self.graphs.dry.as_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Graph names cannot be empty".to_string(),
            ));
        }

        if self.graphs.wet == self.graphs.dry {
            return Err(ConfigError::Invalid(format!(
                "Graph names must differ, both are '{}'",
                self.graphs.wet
            )));
        }

        if self.trace_traps && !LogLevel::Trace.is_at_least(self.log_level) {
            warn!(
                "Trap tracing is enabled but log level is {}; trap events will be filtered",
                self.log_level
            );
        }

        Ok(())
    }

    /// Whether events at `level` should be emitted
    pub fn logs_at(&self, level: LogLevel) -> bool {
        level.is_at_least(self.log_level)
    }
}
