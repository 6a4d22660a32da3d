// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for performer lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Stage preparation and section validation
//! * Stage passes (start, completion, abort)
//! * Scanning progress as seen by the reporting observer

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Stage preparation started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StagePreparing<'a> {
    pub stage: &'a str,
}

impl Display for StagePreparing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Preparing {}", self.stage)
    }
}

impl StructuredLog for StagePreparing<'_> {
    fn log(&self) {
        tracing::info!(stage = self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("stage_preparing", span_name = name, stage = self.stage)
    }
}

/// A stage section is absent from the suite config.
///
/// # Log Level
/// `warn!` when the stage can run empty, `error!` when it cannot
pub struct SectionMissing<'a> {
    pub section: &'a str,
    pub fatal: bool,
}

impl Display for SectionMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No {} defined in config", self.section)
    }
}

impl StructuredLog for SectionMissing<'_> {
    fn log(&self) {
        if self.fatal {
            tracing::error!(section = self.section, "{}", self);
        } else {
            tracing::warn!(section = self.section, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("section_missing", span_name = name, section = self.section)
    }
}

/// A grouped section entry (`dast:`) holds no mapping of named units, so
/// nothing under it is prepared.
///
/// # Log Level
/// `warn!` - The stage still runs without it
pub struct GroupWithoutUnits<'a> {
    pub stage: &'a str,
    pub group: &'a str,
}

impl Display for GroupWithoutUnits<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping {} type '{}': expected a mapping of named units",
            self.stage, self.group
        )
    }
}

impl StructuredLog for GroupWithoutUnits<'_> {
    fn log(&self) {
        tracing::warn!(stage = self.stage, group = self.group, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "group_without_units",
            span_name = name,
            stage = self.stage,
            group = self.group
        )
    }
}

/// Stage pass started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dustpan::observability::messages::stage::StageStarted;
///
/// let msg = StageStarted {
///     stage: "scanning",
///     unit_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct StageStarted<'a> {
    pub stage: &'a str,
    pub unit_count: usize,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting {} with {} units", self.stage, self.unit_count)
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::info!(stage = self.stage, unit_count = self.unit_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage",
            span_name = name,
            stage = self.stage,
            unit_count = self.unit_count,
        )
    }
}

/// Stage pass completed. Unit failures do not prevent completion.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StageCompleted<'a> {
    pub stage: &'a str,
    pub executed: usize,
    pub failed: usize,
    pub scheduled: usize,
    pub duration: Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finished {}: {} units executed ({} failed, {} scheduled mid-pass) in {:?}",
            self.stage, self.executed, self.failed, self.scheduled, self.duration
        )
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            stage = self.stage,
            executed = self.executed,
            failed = self.failed,
            scheduled = self.scheduled,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage_completed",
            span_name = name,
            stage = self.stage,
            executed = self.executed,
            failed = self.failed,
            duration = ?self.duration,
        )
    }
}

/// Stage aborted by a fatal ordering error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StageAborted<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StageAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Aborting {}: {}", self.stage, self.error)
    }
}

impl StructuredLog for StageAborted<'_> {
    fn log(&self) {
        tracing::error!(stage = self.stage, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stage_aborted",
            span_name = name,
            stage = self.stage,
            error = %self.error,
        )
    }
}

/// Scanning pass started (reporting observer view).
///
/// # Log Level
/// `info!` - Important operational event
pub struct TestingStarted;

impl Display for TestingStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Testing started")
    }
}

impl StructuredLog for TestingStarted {
    fn log(&self) {
        tracing::info!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("testing", span_name = name)
    }
}

/// Scanning pass finished (reporting observer view).
///
/// # Log Level
/// `info!` - Important operational event
pub struct TestingFinished {
    pub duration: Duration,
}

impl Display for TestingFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Testing finished ({} seconds)", self.duration.as_secs())
    }
}

impl StructuredLog for TestingFinished {
    fn log(&self) {
        tracing::info!(duration_ms = self.duration.as_millis() as u64, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("testing_finished", span_name = name, duration = ?self.duration)
    }
}

/// One scanner finished (reporting observer view).
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_dustpan::observability::messages::stage::ScannerFinished;
/// use std::time::Duration;
///
/// let msg = ScannerFinished {
///     unit: "dast.zap",
///     duration: Duration::from_secs(42),
///     results: 7,
///     errors: 0,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Finished scanning with dast.zap (42 seconds, 7 results, 0 errors)"
/// );
/// ```
pub struct ScannerFinished<'a> {
    pub unit: &'a str,
    pub duration: Duration,
    pub results: usize,
    pub errors: usize,
}

impl Display for ScannerFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finished scanning with {} ({} seconds, {} results, {} errors)",
            self.unit,
            self.duration.as_secs(),
            self.results,
            self.errors
        )
    }
}

impl StructuredLog for ScannerFinished<'_> {
    fn log(&self) {
        tracing::info!(
            unit = self.unit,
            duration_ms = self.duration.as_millis() as u64,
            results = self.results,
            errors = self.errors,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scanner_finished",
            span_name = name,
            unit = self.unit,
            results = self.results,
            errors = self.errors,
        )
    }
}
