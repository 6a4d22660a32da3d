// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Fatal ordering errors. Either one aborts the stage before any unit executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A required dependency names a unit that is not registered in the stage.
    #[error("missing dependency {dependency} required by {required_by}")]
    MissingDependency {
        dependency: String,
        required_by: String,
    },

    /// `unit` reached `dependency` while `dependency` was still being visited.
    /// `cycle` starts and ends with `dependency`.
    #[error("circular dependency between {unit} and {dependency}: {}", .cycle.join(" -> "))]
    CircularDependency {
        unit: String,
        dependency: String,
        cycle: Vec<String>,
    },
}
