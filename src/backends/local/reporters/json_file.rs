// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::backends::local::options;
use crate::engine::UnitContext;
use crate::errors::ConfigError;
use crate::model::{ErrorRecord, Finding, Options};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// JSON file reporter - writes findings and errors to `file`
pub struct JsonFileReporterFactory;

impl UnitFactory for JsonFileReporterFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("json_file", "Write results to a JSON file")
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        options::required_string(opts, "file").map(|_| ())
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        Ok(Box::new(JsonFileReporter {
            file: options::required_string(&opts, "file")?,
            written: None,
        }))
    }
}

pub struct JsonFileReporter {
    file: String,
    written: Option<Value>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    errors: BTreeMap<&'a str, &'a [ErrorRecord]>,
}

pub fn to_json(
    findings: &[Finding],
    errors: &HashMap<String, Vec<ErrorRecord>>,
) -> serde_json::Result<String> {
    let report = JsonReport {
        findings,
        errors: errors
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

#[async_trait]
impl Unit for JsonFileReporter {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let json = to_json(ctx.findings(), ctx.upstream_errors()).context("failed to serialize report")?;

        if let Some(parent) = Path::new(&self.file).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        tokio::fs::write(&self.file, json)
            .await
            .with_context(|| format!("failed to write {}", self.file))?;

        tracing::info!(unit = ctx.unit(), file = %self.file, "Wrote JSON report");
        self.written = Some(Value::from(self.file.as_str()));
        Ok(())
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        match key {
            "file" => self.written.as_ref(),
            _ => None,
        }
    }
}
