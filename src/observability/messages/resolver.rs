// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency resolution.
//!
//! This module contains message types for logging events related to:
//! * Missing required dependencies
//! * Circular dependency detection
//! * The execution order a resolution produced

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Execution order computed for a stage.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use the_dustpan::observability::messages::resolver::OrderResolved;
///
/// let order = vec!["a".to_string(), "b".to_string()];
/// let msg = OrderResolved {
///     stage: "processing",
///     order: &order,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct OrderResolved<'a> {
    pub stage: &'a str,
    pub order: &'a [String],
}

impl Display for OrderResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved {} order: [{}]",
            self.stage,
            self.order.join(", ")
        )
    }
}

impl StructuredLog for OrderResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            unit_count = self.order.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "order_resolved",
            span_name = name,
            stage = self.stage,
            unit_count = self.order.len(),
        )
    }
}

/// A required dependency is not registered in the stage.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct MissingDependency<'a> {
    pub stage: &'a str,
    pub dependency: &'a str,
    pub required_by: &'a str,
}

impl Display for MissingDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Missing {} dependency {} required by {}",
            self.stage, self.dependency, self.required_by
        )
    }
}

impl StructuredLog for MissingDependency<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            dependency = self.dependency,
            required_by = self.required_by,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "missing_dependency",
            span_name = name,
            stage = self.stage,
            dependency = self.dependency,
            required_by = self.required_by,
        )
    }
}

/// Circular dependency detected while ordering a stage.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dustpan::observability::messages::resolver::CircularDependency;
///
/// let cycle = vec!["p".to_string(), "q".to_string(), "p".to_string()];
/// let msg = CircularDependency {
///     stage: "reporting",
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CircularDependency<'a> {
    pub stage: &'a str,
    pub cycle: &'a [String],
}

impl Display for CircularDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Circular {} dependency: {}",
            self.stage,
            self.cycle.join(" -> ")
        )
    }
}

impl StructuredLog for CircularDependency<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            cycle = %self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "circular_dependency",
            span_name = name,
            stage = self.stage,
            cycle = %self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}
