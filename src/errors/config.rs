// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while loading a suite configuration or checking its shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config version: expected {expected}, found {found}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("suites are not defined")]
    MissingSuites,

    #[error("suite is not defined: {0}")]
    UnknownSuite(String),

    /// A stage section that the run cannot do without.
    #[error("no {0} configuration present")]
    MissingSection(&'static str),

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

impl ConfigError {
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
