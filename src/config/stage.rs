// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_yaml::{Mapping, Value};

use crate::config::SuiteConfig;
use crate::engine::{Stage, UnitPath};
use crate::model::Options;

/// One stage's slice of a suite config: its section and its `general`
/// defaults.
///
/// Owned by the stage's performer. Units never touch it; they only see the
/// merged copy produced by [`StageConfig::merged`].
#[derive(Debug, Clone)]
pub struct StageConfig {
    stage: Stage,
    general: Mapping,
    section: Mapping,
}

impl StageConfig {
    pub fn new(stage: Stage, general: Mapping, section: Mapping) -> Self {
        Self {
            stage,
            general,
            section,
        }
    }

    pub fn from_suite(stage: Stage, suite: &SuiteConfig) -> Self {
        let section = suite
            .section(stage)
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();
        Self::new(stage, suite.general(stage), section)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Configured units in config order with their specific options.
    ///
    /// Entries whose value is not a mapping (e.g. `zap:` with nothing after
    /// it) get empty options.
    pub fn units(&self) -> Vec<(UnitPath, Options)> {
        let mut units = Vec::new();
        for (key, value) in &self.section {
            let Some(key) = key.as_str() else {
                continue;
            };
            if self.stage.is_grouped() {
                let Some(names) = value.as_mapping() else {
                    continue;
                };
                for (name, options) in names {
                    if let Some(name) = name.as_str() {
                        units.push((UnitPath::grouped(key, name), as_options(options)));
                    }
                }
            } else {
                units.push((UnitPath::flat(key), as_options(value)));
            }
        }
        units
    }

    /// Type entries of a grouped stage that hold no mapping of named units
    /// (`dast:` with nothing after it) and so contribute no units. Always
    /// empty for flat stages.
    pub fn groups_without_units(&self) -> Vec<String> {
        if !self.stage.is_grouped() {
            return Vec::new();
        }
        self.section
            .iter()
            .filter(|(_, value)| !value.is_mapping())
            .filter_map(|(key, _)| key.as_str().map(str::to_string))
            .collect()
    }

    /// Defaults applying to `path`: `general.<section>.<type>` in grouped
    /// stages, `general.<section>` in flat ones.
    pub fn defaults_for(&self, path: &UnitPath) -> Mapping {
        if self.stage.is_grouped() {
            self.general
                .get(path.type_id.as_str())
                .and_then(Value::as_mapping)
                .cloned()
                .unwrap_or_default()
        } else {
            self.general.clone()
        }
    }

    /// A new mapping with the stage defaults under `specific`.
    pub fn merged(&self, path: &UnitPath, specific: &Options) -> Options {
        merge_options(&self.defaults_for(path), specific)
    }

    pub fn contains(&self, path: &UnitPath) -> bool {
        self.lookup(path).is_some()
    }

    /// Specific options configured for `path`, if any.
    pub fn options(&self, path: &UnitPath) -> Option<Options> {
        self.lookup(path).map(as_options)
    }

    /// Record a unit entry, as dynamic scheduling does.
    pub fn insert(&mut self, path: &UnitPath, options: Options) {
        match &path.name_id {
            Some(name_id) => {
                let group = self
                    .section
                    .entry(Value::String(path.type_id.clone()))
                    .or_insert_with(|| Value::Mapping(Mapping::new()));
                if !group.is_mapping() {
                    *group = Value::Mapping(Mapping::new());
                }
                if let Value::Mapping(group) = group {
                    group.insert(Value::String(name_id.clone()), Value::Mapping(options));
                }
            }
            None => {
                self.section
                    .insert(Value::String(path.type_id.clone()), Value::Mapping(options));
            }
        }
    }

    fn lookup(&self, path: &UnitPath) -> Option<&Value> {
        let entry = self.section.get(path.type_id.as_str())?;
        match &path.name_id {
            Some(name_id) => entry.get(name_id.as_str()),
            None => Some(entry),
        }
    }
}

/// `defaults` overlaid with `specific`; specific keys win.
pub fn merge_options(defaults: &Mapping, specific: &Options) -> Options {
    let mut merged = defaults.clone();
    for (key, value) in specific {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn as_options(value: &Value) -> Options {
    value.as_mapping().cloned().unwrap_or_default()
}
