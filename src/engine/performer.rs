// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-stage unit lifecycle: prepare, perform, schedule.
//!
//! A [`Performer`] owns one stage's [`UnitRegistry`] and configuration.
//!
//! # Execution Flow
//!
//! 1. **Prepare**: build every configured unit from its merged options,
//!    dropping (and recording) any unit that cannot be built, then resolve
//!    the registry once
//! 2. **Perform**: pop keys from a worklist seeded in registry order and run
//!    each unit not yet marked performed
//! 3. **Schedule**: requests a unit makes while running are applied right
//!    after it returns; every successful schedule re-resolves the whole
//!    registry and re-seeds the worklist from the unperformed keys
//!
//! Execution is strictly sequential. Unit failures are recorded against the
//! unit's registry key and never stop the pass; resolution failures do.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use serde_yaml::Value;

use crate::config::{SuiteConfig, StageConfig};
use crate::engine::{resolver, FactoryMap, Stage, UnitContext, UnitPath, UnitRegistry};
use crate::errors::{ConfigError, ResolveError, UnitError};
use crate::model::{ErrorRecord, Finding, Options};
use crate::observability::messages::resolver::{CircularDependency, MissingDependency, OrderResolved};
use crate::observability::messages::stage::{
    GroupWithoutUnits, ScannerFinished, SectionMissing, StageAborted, StageCompleted, StagePreparing, StageStarted,
    TestingFinished, TestingStarted,
};
use crate::observability::messages::unit::{
    UnitAlreadyRegistered, UnitExecutionCompleted, UnitExecutionFailed, UnitExecutionStarted,
    UnitHookFailed, UnitPrepareFailed, UnitRegistered, UnitScheduled,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Unit;

/// Receives progress notifications from another stage's pass.
///
/// The pipeline wires the reporting performer in as the observer of the
/// scanning pass, so reporters can follow scanners as they run.
pub trait StageObserver: Send {
    fn on_start(&mut self);

    fn on_unit_start(&mut self, unit: &str);

    fn on_unit_finish(&mut self, unit: &str, results: &[Finding], errors: &[ErrorRecord]);

    fn on_finish(&mut self);
}

/// What one pass did, by registry key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    /// Every unit that ran, in execution order.
    pub executed: Vec<String>,
    /// Units whose action returned an error.
    pub failed: Vec<String>,
    /// Units added mid-pass.
    pub scheduled: Vec<String>,
}

impl StageSummary {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            executed: Vec::new(),
            failed: Vec::new(),
            scheduled: Vec::new(),
        }
    }
}

pub struct Performer {
    stage: Stage,
    factories: Arc<FactoryMap>,
    config: StageConfig,
    registry: UnitRegistry,
    performed: HashSet<String>,
    findings: Vec<Finding>,
    upstream_errors: HashMap<String, Vec<ErrorRecord>>,
    /// Prepare, execution and hook failures, by registry key.
    failures: BTreeMap<String, Vec<ErrorRecord>>,
    testing_started: Option<Instant>,
    unit_started: HashMap<String, Instant>,
}

impl Performer {
    pub fn new(stage: Stage, suite: &SuiteConfig, factories: Arc<FactoryMap>) -> Self {
        Self::with_config(StageConfig::from_suite(stage, suite), factories)
    }

    pub fn with_config(config: StageConfig, factories: Arc<FactoryMap>) -> Self {
        Self {
            stage: config.stage(),
            factories,
            config,
            registry: UnitRegistry::new(),
            performed: HashSet::new(),
            findings: Vec::new(),
            upstream_errors: HashMap::new(),
            failures: BTreeMap::new(),
            testing_started: None,
            unit_started: HashMap::new(),
        }
    }

    /// Check that `suite` has a section for `stage`. Scanning and reporting
    /// cannot run without one; processing may.
    pub fn validate_stage(stage: Stage, suite: &SuiteConfig) -> Result<(), ConfigError> {
        if suite.has_section(stage) {
            return Ok(());
        }

        let fatal = stage != Stage::Processing;
        SectionMissing {
            section: stage.section(),
            fatal,
        }
        .log();

        if fatal {
            Err(ConfigError::MissingSection(stage.section()))
        } else {
            Ok(())
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Registry keys in current execution order.
    pub fn order(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }

    pub fn is_performed(&self, key: &str) -> bool {
        self.performed.contains(key)
    }

    /// Build and register every configured unit, then resolve once.
    ///
    /// A unit that cannot be built is logged, recorded and left out, as is a
    /// scanner type with no named scanners under it. A resolution failure is
    /// returned and no unit of this stage may run.
    pub fn prepare(&mut self) -> Result<(), ResolveError> {
        StagePreparing {
            stage: self.stage.name(),
        }
        .log();

        for group in self.config.groups_without_units() {
            GroupWithoutUnits {
                stage: self.stage.name(),
                group: &group,
            }
            .log();
            let record = ErrorRecord::new(group.clone(), "no named units configured under this type");
            self.failures.entry(group).or_default().push(record);
        }

        for (path, specific) in self.config.units() {
            if let Err(error) = self.register(&path, &specific) {
                self.record_prepare_failure(&path, &error);
            }
        }

        self.resolve()
    }

    /// Add a unit after everything already registered and re-resolve.
    ///
    /// Returns `Ok(false)` when nothing was added: the key is already
    /// registered, or the unit could not be built (recorded like a prepare
    /// failure). If the new unit makes the stage unresolvable it is removed
    /// again and the resolution error is returned. A successful schedule
    /// clears whatever an earlier attempt under the same key recorded.
    pub fn schedule_unit(&mut self, path: &UnitPath, extra_config: Options) -> Result<bool, ResolveError> {
        let key = path.key();
        if self.registry.contains_key(&key) {
            UnitAlreadyRegistered {
                stage: self.stage.name(),
                unit: &key,
            }
            .log();
            return Ok(false);
        }

        if let Err(error) = self.register(path, &extra_config) {
            self.record_prepare_failure(path, &error);
            return Ok(false);
        }

        if let Err(error) = self.resolve() {
            self.registry.remove(&key);
            return Err(error);
        }

        self.failures.remove(&key);
        self.config.insert(path, extra_config);
        UnitScheduled {
            stage: self.stage.name(),
            unit: &key,
        }
        .log();
        Ok(true)
    }

    /// Run every unperformed unit in registry order.
    pub async fn perform(&mut self) -> Result<StageSummary, ResolveError> {
        self.perform_observed(None).await
    }

    /// [`perform`](Performer::perform), notifying `observer` of progress.
    pub async fn perform_observed(
        &mut self,
        mut observer: Option<&mut dyn StageObserver>,
    ) -> Result<StageSummary, ResolveError> {
        let started = Instant::now();
        let mut summary = StageSummary::new(self.stage);
        StageStarted {
            stage: self.stage.name(),
            unit_count: self.registry.len(),
        }
        .log();

        if let Some(observer) = observer.as_deref_mut() {
            observer.on_start();
        }

        let mut pending: VecDeque<String> = self.unperformed();
        while let Some(key) = pending.pop_front() {
            if self.performed.contains(&key) {
                continue;
            }
            let Some(entry) = self.registry.get_mut(&key) else {
                continue;
            };
            self.performed.insert(key.clone());

            if let Some(observer) = observer.as_deref_mut() {
                observer.on_unit_start(&key);
            }

            UnitExecutionStarted {
                stage: self.stage.name(),
                unit: &key,
                description: &entry.descriptor.description,
            }
            .log();

            let unit_started = Instant::now();
            let mut ctx = UnitContext::new(self.stage, &key, &mut self.findings, &self.upstream_errors);
            let outcome = entry.unit.execute(&mut ctx).await;
            let requests = ctx.into_requests();

            match outcome {
                Ok(()) => UnitExecutionCompleted {
                    stage: self.stage.name(),
                    unit: &key,
                    duration: unit_started.elapsed(),
                }
                .log(),
                Err(error) => {
                    UnitExecutionFailed {
                        stage: self.stage.name(),
                        unit: &key,
                        error: &error,
                    }
                    .log();
                    self.failures
                        .entry(key.clone())
                        .or_default()
                        .push(ErrorRecord::from_error(&key, &error));
                    summary.failed.push(key.clone());
                }
            }
            summary.executed.push(key.clone());

            if let Some(observer) = observer.as_deref_mut() {
                let errors = self.unit_errors(&key);
                let results = self
                    .registry
                    .get(&key)
                    .map(|entry| entry.unit.results())
                    .unwrap_or_default();
                observer.on_unit_finish(&key, results, &errors);
            }

            let mut rescheduled = false;
            for request in requests {
                let scheduled = match self.schedule_unit(&request.path, request.extra_config) {
                    Ok(scheduled) => scheduled,
                    Err(error) => {
                        StageAborted {
                            stage: self.stage.name(),
                            error: &error,
                        }
                        .log();
                        return Err(error);
                    }
                };
                if scheduled {
                    summary.scheduled.push(request.path.key());
                    rescheduled = true;
                }
            }
            if rescheduled {
                pending = self.unperformed();
            }
        }

        if let Some(observer) = observer.as_deref_mut() {
            observer.on_finish();
        }

        StageCompleted {
            stage: self.stage.name(),
            executed: summary.executed.len(),
            failed: summary.failed.len(),
            scheduled: summary.scheduled.len(),
            duration: started.elapsed(),
        }
        .log();
        Ok(summary)
    }

    /// Take over everything `upstream` produced: its results join the
    /// working set and its errors are kept by upstream registry key.
    pub fn collect(&mut self, upstream: &Performer) {
        self.findings.extend(upstream.results());
        for (key, errors) in upstream.errors() {
            self.upstream_errors.entry(key).or_default().extend(errors);
        }
    }

    /// The working set followed by each unit's own results, in registry
    /// order.
    pub fn results(&self) -> Vec<Finding> {
        let mut results = self.findings.clone();
        for entry in self.registry.iter() {
            results.extend_from_slice(entry.unit.results());
        }
        results
    }

    /// Upstream errors plus everything recorded in this stage, by registry
    /// key.
    pub fn errors(&self) -> BTreeMap<String, Vec<ErrorRecord>> {
        let mut errors: BTreeMap<String, Vec<ErrorRecord>> = self
            .upstream_errors
            .iter()
            .map(|(key, records)| (key.clone(), records.clone()))
            .collect();
        for entry in self.registry.iter() {
            let own = entry.unit.errors();
            if !own.is_empty() {
                errors.entry(entry.key.clone()).or_default().extend_from_slice(own);
            }
        }
        for (key, records) in &self.failures {
            errors.entry(key.clone()).or_default().extend_from_slice(records);
        }
        errors
    }

    /// Errors recorded for one unit of this stage.
    pub fn unit_errors(&self, key: &str) -> Vec<ErrorRecord> {
        let mut errors: Vec<ErrorRecord> = self
            .registry
            .get(key)
            .map(|entry| entry.unit.errors().to_vec())
            .unwrap_or_default();
        if let Some(records) = self.failures.get(key) {
            errors.extend_from_slice(records);
        }
        errors
    }

    /// `meta(key)` of the unit registered at `path`, or `default` when the
    /// unit or the value is absent.
    pub fn unit_meta(&self, path: &UnitPath, key: &str, default: Value) -> Value {
        self.registry
            .get(&path.key())
            .and_then(|entry| entry.unit.meta(key))
            .cloned()
            .unwrap_or(default)
    }

    fn register(&mut self, path: &UnitPath, specific: &Options) -> Result<(), UnitError> {
        let key = path.key();
        if path.is_grouped() != self.stage.is_grouped() {
            return Err(UnitError::PathMismatch {
                unit: key,
                stage: self.stage.name(),
                expected: if self.stage.is_grouped() {
                    "expected <type>.<name>"
                } else {
                    "expected a plain name"
                },
            });
        }

        let factory = self
            .factories
            .get(self.stage, &key)
            .ok_or_else(|| UnitError::UnknownType(key.clone()))?;

        let options = self.config.merged(path, specific);
        factory
            .validate_config(&options)
            .map_err(|source| UnitError::ConfigRejected {
                unit: key.clone(),
                source,
            })?;
        let unit = factory.build(options).map_err(|source| UnitError::BuildFailed {
            unit: key.clone(),
            source,
        })?;

        let descriptor = factory.descriptor();
        UnitRegistered {
            stage: self.stage.name(),
            unit: &key,
            name: &descriptor.name,
        }
        .log();
        self.registry.insert(key, descriptor, unit);
        Ok(())
    }

    fn resolve(&mut self) -> Result<(), ResolveError> {
        match resolver::resolve(&mut self.registry) {
            Ok(()) => {
                OrderResolved {
                    stage: self.stage.name(),
                    order: &self.order(),
                }
                .log();
                Ok(())
            }
            Err(error) => {
                match &error {
                    ResolveError::MissingDependency {
                        dependency,
                        required_by,
                    } => MissingDependency {
                        stage: self.stage.name(),
                        dependency,
                        required_by,
                    }
                    .log(),
                    ResolveError::CircularDependency { cycle, .. } => CircularDependency {
                        stage: self.stage.name(),
                        cycle,
                    }
                    .log(),
                }
                Err(error)
            }
        }
    }

    fn unperformed(&self) -> VecDeque<String> {
        self.registry
            .keys()
            .filter(|key| !self.performed.contains(*key))
            .cloned()
            .collect()
    }

    fn record_prepare_failure(&mut self, path: &UnitPath, error: &UnitError) {
        let key = path.key();
        UnitPrepareFailed {
            stage: self.stage.name(),
            unit: &key,
            error,
        }
        .log();
        self.failures
            .entry(key.clone())
            .or_default()
            .push(ErrorRecord::new(key, error.to_string()));
    }

    fn record_hook_failure(&mut self, key: &str, hook: &str, error: anyhow::Error) {
        UnitHookFailed {
            unit: key,
            hook,
            error: &error,
        }
        .log();
        self.failures
            .entry(key.to_string())
            .or_default()
            .push(ErrorRecord::new(key, format!("{}: {:#}", hook, error)));
    }

    /// Call `hook` on every registered unit, recording failures.
    fn fan_out<F>(&mut self, hook: &str, mut call: F)
    where
        F: FnMut(&mut Box<dyn Unit>) -> anyhow::Result<()>,
    {
        let mut failed = Vec::new();
        for entry in self.registry.iter_mut() {
            if let Err(error) = call(&mut entry.unit) {
                failed.push((entry.key.clone(), error));
            }
        }
        for (key, error) in failed {
            self.record_hook_failure(&key, hook, error);
        }
    }
}

impl StageObserver for Performer {
    fn on_start(&mut self) {
        self.testing_started = Some(Instant::now());
        TestingStarted.log();
        self.fan_out("on_start", |unit| unit.on_start());
    }

    fn on_unit_start(&mut self, unit: &str) {
        self.unit_started.insert(unit.to_string(), Instant::now());
        self.fan_out("on_unit_start", |reporter| reporter.on_unit_start(unit));
    }

    fn on_unit_finish(&mut self, unit: &str, results: &[Finding], errors: &[ErrorRecord]) {
        let duration = self
            .unit_started
            .remove(unit)
            .map(|started| started.elapsed())
            .unwrap_or_default();
        ScannerFinished {
            unit,
            duration,
            results: results.len(),
            errors: errors.len(),
        }
        .log();
        self.fan_out("on_unit_finish", |reporter| reporter.on_unit_finish(unit));
    }

    fn on_finish(&mut self) {
        let duration = self
            .testing_started
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();
        TestingFinished { duration }.log();
        self.fan_out("on_finish", |unit| unit.on_finish());
    }
}

impl std::fmt::Debug for Performer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Performer")
            .field("stage", &self.stage)
            .field("order", &self.order())
            .field("performed", &self.performed.len())
            .finish()
    }
}
