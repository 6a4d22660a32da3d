// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::{FactoryMap, Stage};
use super::processors::*;
use super::reporters::*;
use super::scanners::*;

/// Factory registry for the built-in (in-process) units
pub struct LocalUnitFactory;

impl LocalUnitFactory {
    /// A map holding every built-in unit type.
    pub fn factory_map() -> FactoryMap {
        let mut factories = FactoryMap::new();
        Self::register_all(&mut factories);
        factories
    }

    /// Register the built-in unit types into an application's map:
    /// - scanning: `import.replay`
    /// - processing: `false_positive`, `deduplicate`, `severity_filter`
    /// - reporting: `console`, `json_file`, `fanout`
    pub fn register_all(factories: &mut FactoryMap) {
        factories.register(Stage::Scanning, "import.replay", ReplayScannerFactory);

        factories.register(Stage::Processing, "false_positive", FalsePositiveFactory);
        factories.register(Stage::Processing, "deduplicate", DeduplicateFactory);
        factories.register(Stage::Processing, "severity_filter", SeverityFilterFactory);

        factories.register(Stage::Reporting, "console", ConsoleReporterFactory);
        factories.register(Stage::Reporting, "json_file", JsonFileReporterFactory);
        factories.register(Stage::Reporting, "fanout", FanoutReporterFactory);
    }

    /// List all built-in implementations as `(stage, path)`
    pub fn list_available_implementations() -> Vec<(Stage, &'static str)> {
        vec![
            (Stage::Scanning, "import.replay"),
            (Stage::Processing, "false_positive"),
            (Stage::Processing, "deduplicate"),
            (Stage::Processing, "severity_filter"),
            (Stage::Reporting, "console"),
            (Stage::Reporting, "json_file"),
            (Stage::Reporting, "fanout"),
        ]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(stage: Stage, path: &str) -> bool {
        Self::list_available_implementations().contains(&(stage, path))
    }
}
