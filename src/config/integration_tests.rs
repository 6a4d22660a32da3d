// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fs;

use crate::backends::local::LocalUnitFactory;
use crate::config::{load_suite, parse_suite_with, ConfigFormat, RuntimeBuilder, StageConfig};
use crate::engine::{Stage, UnitPath};
use crate::errors::{ConfigError, RunError};
use crate::model::Severity;

/// Integration tests running the sample suites under configs/
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = "configs/dustpan.yaml";
    const SAMPLE_TOML: &str = "configs/dustpan.toml";

    fn lookup(vars: HashMap<String, String>) -> impl Fn(&str) -> Option<String> {
        move |name: &str| vars.get(name).cloned()
    }

    /// Test that the sample suites load and expose their stage sections
    #[test]
    fn test_sample_suites_load() {
        let ci = load_suite("DUSTPAN_TEST_UNSET_VARIABLE", SAMPLE_YAML, "ci").unwrap();
        assert!(ci.has_section(Stage::Scanning));
        assert!(ci.has_section(Stage::Processing));
        assert!(ci.has_section(Stage::Reporting));

        let processing = StageConfig::from_suite(Stage::Processing, &ci);
        let keys: Vec<String> = processing.units().iter().map(|(p, _)| p.key()).collect();
        assert_eq!(keys, vec!["deduplicate", "severity_filter"]);

        let scanning = StageConfig::from_suite(Stage::Scanning, &ci);
        let path = UnitPath::grouped("import", "replay");
        let merged = scanning.merged(&path, &scanning.options(&path).unwrap());
        assert_eq!(merged.get("tool").and_then(|v| v.as_str()), Some("ci-import"));
    }

    #[test]
    fn test_toml_and_yaml_samples_agree_on_shape() {
        let yaml = load_suite("DUSTPAN_TEST_UNSET_VARIABLE", SAMPLE_YAML, "ci").unwrap();
        let toml = load_suite("DUSTPAN_TEST_UNSET_VARIABLE", SAMPLE_TOML, "ci").unwrap();

        for stage in Stage::ALL {
            let yaml_units: Vec<String> = StageConfig::from_suite(stage, &yaml)
                .units()
                .iter()
                .map(|(p, _)| p.key())
                .collect();
            let toml_units: Vec<String> = StageConfig::from_suite(stage, &toml)
                .units()
                .iter()
                .map(|(p, _)| p.key())
                .collect();
            assert_eq!(yaml_units, toml_units, "{} differs", stage);
        }
    }

    #[tokio::test]
    async fn test_ci_suite_runs_end_to_end() {
        let mut pipeline = RuntimeBuilder::from_source(
            "DUSTPAN_TEST_UNSET_VARIABLE",
            SAMPLE_YAML,
            "ci",
            LocalUnitFactory::factory_map(),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();

        // Three replayed, one duplicate merged, the info finding filtered out
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].tool, "ci-import");
        assert_eq!(report.findings[0].severity, Severity::Medium);
        assert_eq!(report.error_count(), 0);

        let processing = report.summary(Stage::Processing).unwrap();
        assert_eq!(processing.executed, vec!["deduplicate", "severity_filter"]);
    }

    #[tokio::test]
    async fn test_toml_ci_suite_runs_end_to_end() {
        let mut pipeline = RuntimeBuilder::from_source(
            "DUSTPAN_TEST_UNSET_VARIABLE",
            SAMPLE_TOML,
            "ci",
            LocalUnitFactory::factory_map(),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].title, "Missing Content-Security-Policy header");
    }

    /// The nightly suite fans out to a JSON reporter whose path comes from
    /// an environment reference.
    #[tokio::test]
    async fn test_nightly_suite_fans_out_reporters() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("nightly.json");
        let vars = HashMap::from([(
            "DUSTPAN_REPORT".to_string(),
            report_path.display().to_string(),
        )]);

        let text = fs::read_to_string(SAMPLE_YAML).unwrap();
        let suite = parse_suite_with(&text, ConfigFormat::Yaml, "nightly", lookup(vars)).unwrap();
        let mut pipeline = RuntimeBuilder::from_suite(&suite, LocalUnitFactory::factory_map()).unwrap();

        let report = pipeline.run().await.unwrap();

        let reporting = report.summary(Stage::Reporting).unwrap();
        assert_eq!(reporting.scheduled, vec!["console", "json_file"]);
        assert_eq!(reporting.executed, vec!["fanout", "console", "json_file"]);

        // One false positive dropped, two XSS reports merged at the higher severity
        assert_eq!(report.findings.len(), 2);
        let xss = report
            .findings
            .iter()
            .find(|f| f.title == "Reflected cross-site scripting")
            .unwrap();
        assert_eq!(xss.severity, Severity::High);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["findings"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_reporters_section_is_rejected() {
        let text = "config_version: 2\nsuites:\n  bare:\n    scanners: {}\n";
        let suite = parse_suite_with(text, ConfigFormat::Yaml, "bare", lookup(HashMap::new())).unwrap();

        let result = RuntimeBuilder::from_suite(&suite, LocalUnitFactory::factory_map());
        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::MissingSection("reporters")))
        ));
    }

    #[test]
    fn test_unknown_suite_in_sample() {
        let result = load_suite("DUSTPAN_TEST_UNSET_VARIABLE", SAMPLE_YAML, "weekly");
        assert!(matches!(result, Err(ConfigError::UnknownSuite(_))));
    }
}
