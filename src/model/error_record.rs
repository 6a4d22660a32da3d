// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// A failure attributed to one unit, kept for downstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Registry key of the unit the failure belongs to.
    pub unit: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Record an `anyhow` error including its cause chain.
    pub fn from_error(unit: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::new(unit, format!("{:#}", error))
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.unit, self.message)
    }
}
