// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;

use crate::backends::local::options;
use crate::engine::{UnitContext, UnitPath};
use crate::errors::ConfigError;
use crate::model::Options;
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Fan-out reporter - schedules the reporters listed in `reporters`
///
/// Each scheduled reporter gets this unit's options (minus `reporters`) as
/// its specific options. Reporters already registered are left alone.
pub struct FanoutReporterFactory;

impl UnitFactory for FanoutReporterFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("fanout", "Schedule further reporters")
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        match options::string_list(opts, "reporters")? {
            Some(reporters) if !reporters.is_empty() => Ok(()),
            _ => Err(ConfigError::invalid_option("reporters", "at least one reporter is required")),
        }
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        let reporters = options::string_list(&opts, "reporters")?.unwrap_or_default();
        let mut forwarded = opts;
        forwarded.remove("reporters");
        Ok(Box::new(FanoutReporter {
            reporters,
            forwarded,
            scheduled: None,
        }))
    }
}

pub struct FanoutReporter {
    reporters: Vec<String>,
    forwarded: Options,
    scheduled: Option<Value>,
}

#[async_trait]
impl Unit for FanoutReporter {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        for reporter in &self.reporters {
            tracing::info!(unit = ctx.unit(), reporter = %reporter, "Adding reporter");
            ctx.schedule(UnitPath::flat(reporter.as_str()), self.forwarded.clone());
        }
        self.scheduled = Some(Value::from(self.reporters.len() as u64));
        Ok(())
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        match key {
            "scheduled" => self.scheduled.as_ref(),
            _ => None,
        }
    }
}
