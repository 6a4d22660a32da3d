// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::engine::{Stage, UnitPath};
use crate::model::{ErrorRecord, Finding, Options};

/// A request made by an executing unit to add another unit to its stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub path: UnitPath,
    pub extra_config: Options,
}

/// The executing unit's handle back into its performer.
///
/// Gives access to the stage's working result set and upstream errors, and
/// collects scheduling requests. The performer applies those requests as
/// soon as the unit returns, before any other unit runs, so a unit
/// scheduled here still executes within the same pass.
pub struct UnitContext<'a> {
    stage: Stage,
    unit: &'a str,
    findings: &'a mut Vec<Finding>,
    upstream_errors: &'a HashMap<String, Vec<ErrorRecord>>,
    requests: Vec<ScheduleRequest>,
}

impl<'a> UnitContext<'a> {
    pub fn new(
        stage: Stage,
        unit: &'a str,
        findings: &'a mut Vec<Finding>,
        upstream_errors: &'a HashMap<String, Vec<ErrorRecord>>,
    ) -> Self {
        Self {
            stage,
            unit,
            findings,
            upstream_errors,
            requests: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Registry key of the executing unit.
    pub fn unit(&self) -> &str {
        self.unit
    }

    /// The stage's working result set. Empty while scanning; the aggregated
    /// upstream findings during processing and reporting.
    pub fn findings(&self) -> &[Finding] {
        self.findings
    }

    pub fn findings_mut(&mut self) -> &mut Vec<Finding> {
        self.findings
    }

    /// Errors collected from earlier stages, keyed by upstream registry key.
    pub fn upstream_errors(&self) -> &HashMap<String, Vec<ErrorRecord>> {
        self.upstream_errors
    }

    /// Ask the performer to add a unit after everything already configured.
    /// Scheduling a key that is already registered is a no-op.
    pub fn schedule(&mut self, path: UnitPath, extra_config: Options) {
        self.requests.push(ScheduleRequest { path, extra_config });
    }

    pub fn pending_requests(&self) -> &[ScheduleRequest] {
        &self.requests
    }

    pub(crate) fn into_requests(self) -> Vec<ScheduleRequest> {
        self.requests
    }
}
