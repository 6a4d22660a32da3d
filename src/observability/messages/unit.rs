// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for unit preparation, execution and scheduling.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A configured or scheduled unit could not be prepared and was skipped.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_dustpan::observability::messages::unit::UnitPrepareFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "missing option 'target'");
/// let msg = UnitPrepareFailed {
///     stage: "scanning",
///     unit: "dast.zap",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnitPrepareFailed<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for UnitPrepareFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to prepare {} unit {}: {}",
            self.stage, self.unit, self.error
        )
    }
}

impl StructuredLog for UnitPrepareFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            unit = self.unit,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_prepare_failed",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
            error = %self.error,
        )
    }
}

/// Unit instantiated and registered.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct UnitRegistered<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
    pub name: &'a str,
}

impl Display for UnitRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered {} unit {} as '{}'",
            self.stage, self.unit, self.name
        )
    }
}

impl StructuredLog for UnitRegistered<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, unit = self.unit, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_registered",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
        )
    }
}

/// Unit execution started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct UnitExecutionStarted<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
    pub description: &'a str,
}

impl Display for UnitExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(f, "Running {}", self.unit)
        } else {
            write!(f, "Running {} ({})", self.unit, self.description)
        }
    }
}

impl StructuredLog for UnitExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(stage = self.stage, unit = self.unit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "unit_execution",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
        )
    }
}

/// Unit execution completed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct UnitExecutionCompleted<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
    pub duration: Duration,
}

impl Display for UnitExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit {} completed in {:?}", self.unit, self.duration)
    }
}

impl StructuredLog for UnitExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            unit = self.unit,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_completed",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
            duration = ?self.duration,
        )
    }
}

/// Unit execution failed. The stage continues with the next unit.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitExecutionFailed<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
    pub error: &'a anyhow::Error,
}

impl Display for UnitExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit {} failed: {:#}", self.unit, self.error)
    }
}

impl StructuredLog for UnitExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            unit = self.unit,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_failed",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
        )
    }
}

/// A unit was scheduled mid-pass and the stage re-resolved.
///
/// # Log Level
/// `info!` - Important operational event
pub struct UnitScheduled<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
}

impl Display for UnitScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Scheduled {} unit {}", self.stage, self.unit)
    }
}

impl StructuredLog for UnitScheduled<'_> {
    fn log(&self) {
        tracing::info!(stage = self.stage, unit = self.unit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "unit_scheduled",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
        )
    }
}

/// Scheduling skipped because the key is already registered.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct UnitAlreadyRegistered<'a> {
    pub stage: &'a str,
    pub unit: &'a str,
}

impl Display for UnitAlreadyRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit {} already registered in {}", self.unit, self.stage)
    }
}

impl StructuredLog for UnitAlreadyRegistered<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, unit = self.unit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_already_registered",
            span_name = name,
            stage = self.stage,
            unit = self.unit,
        )
    }
}

/// A lifecycle hook on a reporting unit failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitHookFailed<'a> {
    pub unit: &'a str,
    pub hook: &'a str,
    pub error: &'a anyhow::Error,
}

impl Display for UnitHookFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Reporter {} failed in {}: {:#}", self.unit, self.hook, self.error)
    }
}

impl StructuredLog for UnitHookFailed<'_> {
    fn log(&self) {
        tracing::error!(unit = self.unit, hook = self.hook, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_hook_failed",
            span_name = name,
            unit = self.unit,
            hook = self.hook,
        )
    }
}
