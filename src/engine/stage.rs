// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// One phase of the pipeline. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Scanning,
    Processing,
    Reporting,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Scanning, Stage::Processing, Stage::Reporting];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Scanning => "scanning",
            Stage::Processing => "processing",
            Stage::Reporting => "reporting",
        }
    }

    /// Key of this stage's section in a suite config (and under `general`).
    pub fn section(&self) -> &'static str {
        match self {
            Stage::Scanning => "scanners",
            Stage::Processing => "processing",
            Stage::Reporting => "reporters",
        }
    }

    /// Grouped stages nest units as `<type>: <name>: options`; flat stages
    /// use `<name>: options`.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Stage::Scanning)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a unit lives in its stage's config tree.
///
/// The display form (`dast.zap`, `html`) is both the factory key and the
/// registry key of the unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitPath {
    pub type_id: String,
    pub name_id: Option<String>,
}

impl UnitPath {
    pub fn grouped(type_id: impl Into<String>, name_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            name_id: Some(name_id.into()),
        }
    }

    pub fn flat(name: impl Into<String>) -> Self {
        Self {
            type_id: name.into(),
            name_id: None,
        }
    }

    /// Parse `type.name` or `name`.
    pub fn parse(key: &str) -> Self {
        match key.split_once('.') {
            Some((type_id, name_id)) => Self::grouped(type_id, name_id),
            None => Self::flat(key),
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.name_id.is_some()
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UnitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name_id {
            Some(name_id) => write!(f, "{}.{}", self.type_id, name_id),
            None => f.write_str(&self.type_id),
        }
    }
}
