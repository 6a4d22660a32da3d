// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Value types that flow between pipeline stages.
//!
//! Scanners produce [`Finding`]s, processors reshape the working set of
//! findings, and reporters consume it. Failures attributed to a unit are
//! carried alongside as [`ErrorRecord`]s.

mod error_record;
mod finding;

pub use error_record::ErrorRecord;
pub use finding::{Finding, Severity};

/// A unit's merged configuration.
pub type Options = serde_yaml::Mapping;
