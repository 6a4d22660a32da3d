// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::HashMap;

use crate::engine::UnitContext;
use crate::model::{Finding, Options};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Deduplicate processor - merges findings with the same fingerprint
///
/// The first occurrence is kept in place and takes the highest severity of
/// its duplicates. Runs after `false_positive` when both are configured.
pub struct DeduplicateFactory;

impl UnitFactory for DeduplicateFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("deduplicate", "Merge duplicate findings").run_after(["false_positive"])
    }

    fn build(&self, _options: Options) -> anyhow::Result<Box<dyn Unit>> {
        Ok(Box::new(DeduplicateProcessor { removed: None }))
    }
}

pub struct DeduplicateProcessor {
    removed: Option<Value>,
}

/// Collapse `findings` by fingerprint, returning how many were dropped.
pub fn deduplicate(findings: &mut Vec<Finding>) -> usize {
    let before = findings.len();
    let mut kept: Vec<Finding> = Vec::with_capacity(before);
    let mut index: HashMap<String, usize> = HashMap::new();

    for finding in findings.drain(..) {
        match index.get(&finding.fingerprint()) {
            Some(&position) => {
                let existing = &mut kept[position];
                existing.severity = existing.severity.max(finding.severity);
                if existing.description.is_empty() {
                    existing.description = finding.description;
                }
            }
            None => {
                index.insert(finding.fingerprint(), kept.len());
                kept.push(finding);
            }
        }
    }

    *findings = kept;
    before - findings.len()
}

#[async_trait]
impl Unit for DeduplicateProcessor {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let removed = deduplicate(ctx.findings_mut());
        tracing::info!(unit = ctx.unit(), removed, "Removed duplicate findings");
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
