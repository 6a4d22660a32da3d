// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use async_trait::async_trait;
use serde_yaml::{Mapping, Value};

use crate::backends::local::options;
use crate::engine::UnitContext;
use crate::errors::ConfigError;
use crate::model::{ErrorRecord, Finding, Options};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Replay scanner - imports findings produced elsewhere
///
/// Options:
/// - `file`: YAML or JSON list of findings
/// - `findings`: the same list inline
/// - `tool`: tool name for findings that carry none (default: the unit key)
///
/// At least one of `file` and `findings` is required. A file that cannot be
/// read is recorded as an error of this unit; inline findings are still
/// reported.
pub struct ReplayScannerFactory;

impl UnitFactory for ReplayScannerFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("replay", "Replay findings from a file or inline list")
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        let file = options::string(opts, "file")?;
        let inline = inline_findings(opts)?;
        if file.is_none() && inline.is_none() {
            return Err(ConfigError::invalid_option(
                "file",
                "either 'file' or 'findings' is required",
            ));
        }
        Ok(())
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        Ok(Box::new(ReplayScanner {
            file: options::string(&opts, "file")?,
            inline: inline_findings(&opts)?.unwrap_or_default(),
            tool: options::string(&opts, "tool")?,
            results: Vec::new(),
            errors: Vec::new(),
            meta: Mapping::new(),
        }))
    }
}

fn inline_findings(opts: &Options) -> Result<Option<Vec<Finding>>, ConfigError> {
    match opts.get("findings") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_yaml::from_value(value.clone())
            .map(Some)
            .map_err(|e| ConfigError::invalid_option("findings", e.to_string())),
    }
}

pub struct ReplayScanner {
    file: Option<String>,
    inline: Vec<Finding>,
    tool: Option<String>,
    results: Vec<Finding>,
    errors: Vec<ErrorRecord>,
    meta: Mapping,
}

impl ReplayScanner {
    async fn load_file(path: &str) -> anyhow::Result<Vec<Finding>> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path))?;
        let findings = serde_yaml::from_str(&text).with_context(|| format!("failed to parse {}", path))?;
        Ok(findings)
    }
}

#[async_trait]
impl Unit for ReplayScanner {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let mut findings = self.inline.clone();
        let mut source = if findings.is_empty() { "none" } else { "inline" };

        if let Some(path) = &self.file {
            match Self::load_file(path).await {
                Ok(loaded) => {
                    findings.extend(loaded);
                    source = if source == "inline" { "file+inline" } else { "file" };
                }
                Err(e) => self.errors.push(ErrorRecord::from_error(ctx.unit(), &e)),
            }
        }

        let tool = self.tool.clone().unwrap_or_else(|| ctx.unit().to_string());
        for finding in &mut findings {
            if finding.tool.is_empty() {
                finding.tool = tool.clone();
            }
        }

        tracing::info!(unit = ctx.unit(), count = findings.len(), source, "Replayed findings");
        self.meta.insert(Value::from("source"), Value::from(source));
        self.meta.insert(Value::from("count"), Value::from(findings.len() as u64));
        self.results = findings;
        Ok(())
    }

    fn results(&self) -> &[Finding] {
        &self.results
    }

    fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }
}
