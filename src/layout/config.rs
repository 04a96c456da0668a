//! Configuration for applying resize actions

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a resize configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// What to do with a resize entry whose element id is not in the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownIdPolicy {
    /// Skip the entry silently
    #[default]
    Ignore,
    /// Skip the entry and log a warning
    Warn,
    /// Reject the whole action before anything is changed
    Error,
}

/// Configuration options for resize application
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Handling of element ids that do not resolve to a node
    pub unknown_ids: UnknownIdPolicy,

    /// Reject NaN or infinite widths and heights
    pub reject_non_finite: bool,
}

impl ResizeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the unknown id policy
    pub fn with_unknown_ids(mut self, policy: UnknownIdPolicy) -> Self {
        self.unknown_ids = policy;
        self
    }

    /// Enable or disable rejection of non-finite dimensions
    pub fn with_reject_non_finite(mut self, reject: bool) -> Self {
        self.reject_non_finite = reject;
        self
    }

    /// True when this configuration may refuse an action
    pub fn validates(&self) -> bool {
        self.unknown_ids == UnknownIdPolicy::Error || self.reject_non_finite
    }
}
