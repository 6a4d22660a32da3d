// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::model::Options;
use crate::traits::Unit;

/// Static facts about a unit type, available before any instance exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitDescriptor {
    /// Stage-unique identifier other units use to depend on this one.
    pub name: String,
    pub description: String,
    /// Identifiers that must be present in the stage and run first.
    pub depends_on: Vec<String>,
    /// Identifiers that run first when present; absence is not an error.
    pub run_after: Vec<String>,
}

impl UnitDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn run_after<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_after.extend(deps.into_iter().map(Into::into));
        self
    }
}

/// Constructor-free description and builder for one unit type.
///
/// The application registers one factory per unit type in a
/// [`FactoryMap`](crate::engine::FactoryMap); performers consult it when
/// preparing configured units and when units are scheduled mid-pass.
pub trait UnitFactory: Send + Sync {
    fn descriptor(&self) -> UnitDescriptor;

    /// Fail fast when required options are absent or malformed.
    fn validate_config(&self, _options: &Options) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Build an instance that owns its merged configuration.
    fn build(&self, options: Options) -> anyhow::Result<Box<dyn Unit>>;
}
