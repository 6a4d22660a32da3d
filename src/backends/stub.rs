// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_yaml::{Mapping, Value};

use crate::engine::{UnitContext, UnitPath};
use crate::errors::ConfigError;
use crate::model::{Finding, Options};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Shared record of what stub units did, in order.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// A unit that does nothing, for registry and resolver tests
pub struct NoopUnit;

#[async_trait::async_trait]
impl Unit for NoopUnit {
    async fn execute(&mut self, _ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// What a [`StubUnit`] does when executed.
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail,
    /// Schedule each path with its extra options, then succeed.
    Schedule(Vec<(UnitPath, Options)>),
    /// Keep these as the unit's own results.
    Emit(Vec<Finding>),
}

/// Configurable factory for stub units
#[derive(Clone)]
pub struct StubFactory {
    descriptor: UnitDescriptor,
    behavior: Behavior,
    journal: Option<Journal>,
    required_option: Option<String>,
    meta: Mapping,
    fail_build: bool,
    fail_hooks: bool,
}

impl StubFactory {
    pub fn new(name: &str) -> Self {
        Self {
            descriptor: UnitDescriptor::new(name, format!("stub {}", name)),
            behavior: Behavior::Succeed,
            journal: None,
            required_option: None,
            meta: Mapping::new(),
            fail_build: false,
            fail_hooks: false,
        }
    }

    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.descriptor = self.descriptor.depends_on(deps.iter().copied());
        self
    }

    pub fn run_after(mut self, deps: &[&str]) -> Self {
        self.descriptor = self.descriptor.run_after(deps.iter().copied());
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub fn require_option(mut self, option: &str) -> Self {
        self.required_option = Some(option.to_string());
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.meta
            .insert(Value::String(key.to_string()), Value::String(value.to_string()));
        self
    }

    pub fn fail_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn fail_hooks(mut self) -> Self {
        self.fail_hooks = true;
        self
    }
}

impl UnitFactory for StubFactory {
    fn descriptor(&self) -> UnitDescriptor {
        self.descriptor.clone()
    }

    fn validate_config(&self, options: &Options) -> Result<(), ConfigError> {
        match &self.required_option {
            Some(option) if !options.contains_key(option.as_str()) => {
                Err(ConfigError::invalid_option(option.clone(), "option is required"))
            }
            _ => Ok(()),
        }
    }

    fn build(&self, options: Options) -> anyhow::Result<Box<dyn Unit>> {
        if self.fail_build {
            return Err(anyhow!("{} cannot be built", self.descriptor.name));
        }

        let mut meta = self.meta.clone();
        meta.insert(Value::String("options".to_string()), Value::Mapping(options));
        Ok(Box::new(StubUnit {
            name: self.descriptor.name.clone(),
            behavior: self.behavior.clone(),
            journal: self.journal.clone(),
            meta,
            results: Vec::new(),
            fail_hooks: self.fail_hooks,
        }))
    }
}

/// Unit built by [`StubFactory`].
///
/// Meta keys: `options` (merged options it was built with) and `seen`
/// (size of the working set when it ran).
pub struct StubUnit {
    name: String,
    behavior: Behavior,
    journal: Option<Journal>,
    meta: Mapping,
    results: Vec<Finding>,
    fail_hooks: bool,
}

impl StubUnit {
    fn note(&self, entry: String) {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(entry);
        }
    }

    fn hook(&self, hook: &str) -> anyhow::Result<()> {
        self.note(format!("{}:{}", self.name, hook));
        if self.fail_hooks {
            Err(anyhow!("{} hook failed", hook))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Unit for StubUnit {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        self.note(self.name.clone());
        self.meta.insert(
            Value::String("seen".to_string()),
            Value::from(ctx.findings().len() as u64),
        );

        match &self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(anyhow!("{} failed on purpose", self.name)),
            Behavior::Schedule(requests) => {
                for (path, options) in requests {
                    ctx.schedule(path.clone(), options.clone());
                }
                Ok(())
            }
            Behavior::Emit(findings) => {
                self.results = findings.clone();
                Ok(())
            }
        }
    }

    fn results(&self) -> &[Finding] {
        &self.results
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    fn on_start(&mut self) -> anyhow::Result<()> {
        self.hook("on_start")
    }

    fn on_finish(&mut self) -> anyhow::Result<()> {
        self.hook("on_finish")
    }

    fn on_unit_start(&mut self, unit: &str) -> anyhow::Result<()> {
        self.hook(&format!("on_unit_start({})", unit))
    }

    fn on_unit_finish(&mut self, unit: &str) -> anyhow::Result<()> {
        self.hook(&format!("on_unit_finish({})", unit))
    }
}
