// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::SuiteConfig;
use crate::engine::{FactoryMap, Performer, Stage, StageObserver, StageSummary};
use crate::errors::{ResolveError, RunError};
use crate::model::{ErrorRecord, Finding};
use crate::observability::messages::stage::StageAborted;
use crate::observability::messages::StructuredLog;

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Scanning, processing and reporting, in that order.
    pub summaries: Vec<StageSummary>,
    /// Findings as they reached the reporters.
    pub findings: Vec<Finding>,
    /// Every recorded failure, by registry key.
    pub errors: BTreeMap<String, Vec<ErrorRecord>>,
}

impl RunReport {
    pub fn summary(&self, stage: Stage) -> Option<&StageSummary> {
        self.summaries.iter().find(|summary| summary.stage == stage)
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

/// The three performers of one suite, driven in stage order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_dustpan::backends::local::LocalUnitFactory;
/// use the_dustpan::config::SuiteConfig;
/// use the_dustpan::engine::Pipeline;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let suite = SuiteConfig::from_yaml(
///     "demo",
///     r#"
/// scanners:
///   import:
///     replay:
///       findings:
///         - title: Open redirect
///           severity: medium
///         - title: Open redirect
///           severity: medium
/// processing:
///   deduplicate: {}
/// reporters:
///   console: {}
/// "#,
/// )?;
///
/// let mut pipeline = Pipeline::new(&suite, Arc::new(LocalUnitFactory::factory_map()))?;
/// let report = pipeline.run().await?;
/// assert_eq!(report.findings.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline {
    scanning: Performer,
    processing: Performer,
    reporting: Performer,
}

impl Pipeline {
    /// Check stage sections and create the performers. Nothing is built yet.
    pub fn new(suite: &SuiteConfig, factories: Arc<FactoryMap>) -> Result<Self, RunError> {
        for stage in Stage::ALL {
            Performer::validate_stage(stage, suite)?;
        }

        Ok(Self {
            scanning: Performer::new(Stage::Scanning, suite, factories.clone()),
            processing: Performer::new(Stage::Processing, suite, factories.clone()),
            reporting: Performer::new(Stage::Reporting, suite, factories),
        })
    }

    pub fn performer(&self, stage: Stage) -> &Performer {
        match stage {
            Stage::Scanning => &self.scanning,
            Stage::Processing => &self.processing,
            Stage::Reporting => &self.reporting,
        }
    }

    pub fn performer_mut(&mut self, stage: Stage) -> &mut Performer {
        match stage {
            Stage::Scanning => &mut self.scanning,
            Stage::Processing => &mut self.processing,
            Stage::Reporting => &mut self.reporting,
        }
    }

    /// Prepare every stage, then scan, process and report.
    ///
    /// Reporters are prepared before scanning starts so they can observe it.
    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        let started = Instant::now();
        for stage in Stage::ALL {
            self.performer_mut(stage)
                .prepare()
                .map_err(|source| aborted(stage, source))?;
        }

        let scanning = self
            .scanning
            .perform_observed(Some(&mut self.reporting as &mut dyn StageObserver))
            .await
            .map_err(|source| RunError::stage(Stage::Scanning, source))?;

        self.processing.collect(&self.scanning);
        let processing = self
            .processing
            .perform()
            .await
            .map_err(|source| RunError::stage(Stage::Processing, source))?;

        self.reporting.collect(&self.processing);
        let reporting = self
            .reporting
            .perform()
            .await
            .map_err(|source| RunError::stage(Stage::Reporting, source))?;

        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            "Run finished"
        );

        Ok(RunReport {
            summaries: vec![scanning, processing, reporting],
            findings: self.reporting.results(),
            errors: self.reporting.errors(),
        })
    }
}

fn aborted(stage: Stage, source: ResolveError) -> RunError {
    StageAborted {
        stage: stage.name(),
        error: &source,
    }
    .log();
    RunError::stage(stage, source)
}
