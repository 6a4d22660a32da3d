// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_suite, SuiteConfig};
use crate::engine::{FactoryMap, Pipeline};
use crate::errors::RunError;

/// Pipeline builder - ties a suite config to the available unit factories.
///
/// # Examples
///
/// ```
/// use the_dustpan::backends::local::LocalUnitFactory;
/// use the_dustpan::config::{RuntimeBuilder, SuiteConfig};
///
/// let suite = SuiteConfig::from_yaml(
///     "ci",
///     "scanners: {}\nreporters:\n  console: {}\n",
/// ).unwrap();
///
/// let pipeline = RuntimeBuilder::from_suite(&suite, LocalUnitFactory::factory_map()).unwrap();
/// assert_eq!(pipeline.performer(the_dustpan::engine::Stage::Reporting).stage().name(), "reporting");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a pipeline for an already loaded suite.
    ///
    /// Fails when the suite lacks a `scanners` or `reporters` section.
    pub fn from_suite(suite: &SuiteConfig, factories: FactoryMap) -> Result<Pipeline, RunError> {
        Pipeline::new(suite, Arc::new(factories))
    }

    /// Load `suite` from `config_variable` or `config_file` and build its
    /// pipeline.
    pub fn from_source<P: AsRef<Path>>(
        config_variable: &str,
        config_file: P,
        suite: &str,
        factories: FactoryMap,
    ) -> Result<Pipeline, RunError> {
        let suite = load_suite(config_variable, config_file, suite)?;
        Self::from_suite(&suite, factories)
    }
}
