// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::ConfigError;

/// Unit-isolated preparation failures. These are logged and the unit is
/// dropped from its stage; sibling units are unaffected.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("no factory registered for unit type '{0}'")]
    UnknownType(String),

    #[error("configuration rejected for '{unit}': {source}")]
    ConfigRejected {
        unit: String,
        #[source]
        source: ConfigError,
    },

    #[error("'{unit}' does not fit the {stage} stage ({expected})")]
    PathMismatch {
        unit: String,
        stage: &'static str,
        expected: &'static str,
    },

    #[error("failed to build '{unit}': {source:#}")]
    BuildFailed {
        unit: String,
        #[source]
        source: anyhow::Error,
    },
}
