// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;

use crate::backends::local::options;
use crate::engine::UnitContext;
use crate::errors::ConfigError;
use crate::model::{Options, Severity};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Severity filter processor - drops findings below `min_severity`
pub struct SeverityFilterFactory;

impl UnitFactory for SeverityFilterFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("severity_filter", "Drop findings below a minimum severity")
            .run_after(["false_positive", "deduplicate"])
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        options::severity(opts, "min_severity")?
            .map(|_| ())
            .ok_or_else(|| ConfigError::invalid_option("min_severity", "option is required"))
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        let min_severity = options::severity(&opts, "min_severity")?.unwrap_or_default();
        Ok(Box::new(SeverityFilterProcessor {
            min_severity,
            removed: None,
        }))
    }
}

pub struct SeverityFilterProcessor {
    min_severity: Severity,
    removed: Option<Value>,
}

#[async_trait]
impl Unit for SeverityFilterProcessor {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let min_severity = self.min_severity;
        let findings = ctx.findings_mut();
        let before = findings.len();
        findings.retain(|finding| finding.severity >= min_severity);
        let removed = before - findings.len();

        tracing::info!(
            unit = ctx.unit(),
            removed,
            min_severity = %min_severity,
            "Filtered findings by severity"
        );
        self.removed = Some(Value::from(removed as u64));
        Ok(())
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        match key {
            "removed" => self.removed.as_ref(),
            _ => None,
        }
    }
}
