// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::HashSet;

use crate::backends::local::options;
use crate::engine::UnitContext;
use crate::errors::ConfigError;
use crate::model::Options;
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// False-positive processor - drops findings whose fingerprint is listed
///
/// Options:
/// - `file`: one fingerprint per line; blank lines and `#` comments ignored
/// - `fingerprints`: the same list inline
pub struct FalsePositiveFactory;

impl UnitFactory for FalsePositiveFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("false_positive", "Filter out known false positives")
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        let file = options::string(opts, "file")?;
        let inline = options::string_list(opts, "fingerprints")?;
        if file.is_none() && inline.is_none() {
            return Err(ConfigError::invalid_option(
                "file",
                "either 'file' or 'fingerprints' is required",
            ));
        }
        Ok(())
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        Ok(Box::new(FalsePositiveProcessor {
            file: options::string(&opts, "file")?,
            inline: options::string_list(&opts, "fingerprints")?.unwrap_or_default(),
            removed: None,
        }))
    }
}

pub struct FalsePositiveProcessor {
    file: Option<String>,
    inline: Vec<String>,
    removed: Option<Value>,
}

/// Fingerprints listed in a false-positive file.
pub fn parse_fingerprints(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Unit for FalsePositiveProcessor {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let mut known: HashSet<String> = self.inline.iter().cloned().collect();
        if let Some(path) = &self.file {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read false-positive file {}", path))?;
            known.extend(parse_fingerprints(&text));
        }

        let findings = ctx.findings_mut();
        let before = findings.len();
        findings.retain(|finding| !known.contains(&finding.fingerprint()));
        let removed = before - findings.len();

        tracing::info!(unit = ctx.unit(), removed, "Processed false positives");
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
