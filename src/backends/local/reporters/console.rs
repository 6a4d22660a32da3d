// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::backends::local::options;
use crate::engine::UnitContext;
use crate::errors::ConfigError;
use crate::model::{ErrorRecord, Finding, Options, Severity};
use crate::traits::{Unit, UnitDescriptor, UnitFactory};

/// Console reporter - prints findings and errors to stdout
///
/// Also follows the scanning pass, printing a line per scanner. Findings
/// below the optional `min_severity` are counted but not listed.
pub struct ConsoleReporterFactory;

impl UnitFactory for ConsoleReporterFactory {
    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new("console", "Print results to the console")
    }

    fn validate_config(&self, opts: &Options) -> Result<(), ConfigError> {
        options::severity(opts, "min_severity").map(|_| ())
    }

    fn build(&self, opts: Options) -> anyhow::Result<Box<dyn Unit>> {
        Ok(Box::new(ConsoleReporter {
            min_severity: options::severity(&opts, "min_severity")?.unwrap_or_default(),
            scanners: 0,
            printed: None,
        }))
    }
}

pub struct ConsoleReporter {
    min_severity: Severity,
    scanners: u64,
    printed: Option<Value>,
}

/// Render the report body. Errors are listed by unit key.
pub fn render(
    findings: &[Finding],
    errors: &HashMap<String, Vec<ErrorRecord>>,
    min_severity: Severity,
) -> (String, usize) {
    let mut shown: Vec<&Finding> = findings
        .iter()
        .filter(|finding| finding.severity >= min_severity)
        .collect();
    shown.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut out = String::new();
    let _ = writeln!(out, "📋 Findings: {} ({} shown)", findings.len(), shown.len());
    for finding in &shown {
        let _ = write!(out, "  [{}] {} ({})", finding.severity, finding.title, finding.tool);
        if !finding.endpoints.is_empty() {
            let _ = write!(out, " at {}", finding.endpoints.join(", "));
        }
        out.push('\n');
    }

    let sorted: BTreeMap<&String, &Vec<ErrorRecord>> = errors.iter().collect();
    let error_count: usize = sorted.values().map(|records| records.len()).sum();
    if error_count > 0 {
        let _ = writeln!(out, "⚠️  Errors: {}", error_count);
        for records in sorted.values() {
            for record in records.iter() {
                let _ = writeln!(out, "  {}", record);
            }
        }
    }
    (out, shown.len())
}

#[async_trait]
impl Unit for ConsoleReporter {
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()> {
        let (body, shown) = render(ctx.findings(), ctx.upstream_errors(), self.min_severity);
        println!("{}", body);
        self.printed = Some(Value::from(shown as u64));
        Ok(())
    }

    fn meta(&self, key: &str) -> Option<&Value> {
        match key {
            "printed" => self.printed.as_ref(),
            _ => None,
        }
    }

    fn on_start(&mut self) -> anyhow::Result<()> {
        println!("🚀 Testing started");
        Ok(())
    }

    fn on_unit_start(&mut self, unit: &str) -> anyhow::Result<()> {
        println!("🔍 Running {}", unit);
        Ok(())
    }

    fn on_unit_finish(&mut self, unit: &str) -> anyhow::Result<()> {
        self.scanners += 1;
        println!("✅ Finished {}", unit);
        Ok(())
    }

    fn on_finish(&mut self) -> anyhow::Result<()> {
        println!("🏁 Testing finished ({} scanners)", self.scanners);
        Ok(())
    }
}
