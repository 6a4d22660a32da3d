// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::config::consts::{
    CONFIG_VERSION_KEY, CURRENT_CONFIG_VERSION, GENERAL_SECTION, SUITES_SECTION,
};
use crate::engine::Stage;
use crate::errors::ConfigError;
use crate::observability::messages::{config::ConfigLoading, StructuredLog};

/// The configuration of one suite, selected from a config document.
///
/// # Example
/// ```yaml
/// config_version: 2
/// suites:
///   nightly:
///     general:
///       scanners:
///         dast:
///           target: https://staging.example.com
///       reporters:
///         severity: high
///     scanners:
///       dast:
///         zap:
///           scan_types: all
///     processing:
///       deduplicate: {}
///     reporters:
///       console: {}
/// ```
#[derive(Debug, Clone, Default)]
pub struct SuiteConfig {
    name: String,
    tree: Mapping,
}

impl SuiteConfig {
    pub fn new(name: impl Into<String>, tree: Mapping) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }

    /// Build a suite straight from the YAML body of a suite (no `suites`
    /// wrapper, no version check).
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, ConfigError> {
        let tree = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(tree) => tree,
            _ => Mapping::new(),
        };
        Ok(Self::new(name, tree))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stage's section, if present and not null.
    pub fn section(&self, stage: Stage) -> Option<&Value> {
        self.tree
            .get(stage.section())
            .filter(|value| !value.is_null())
    }

    pub fn has_section(&self, stage: Stage) -> bool {
        self.section(stage).is_some()
    }

    /// `general.<section>` as a mapping; empty when absent.
    pub fn general(&self, stage: Stage) -> Mapping {
        self.tree
            .get(GENERAL_SECTION)
            .and_then(|general| general.get(stage.section()))
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default()
    }

    pub fn tree(&self) -> &Mapping {
        &self.tree
    }
}

/// Syntax of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// TOML for `.toml` files, YAML for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load `suite` from the document in environment variable `config_variable`
/// when it is set and non-empty, otherwise from `config_file`.
pub fn load_suite<P: AsRef<Path>>(
    config_variable: &str,
    config_file: P,
    suite: &str,
) -> Result<SuiteConfig, ConfigError> {
    let from_env = std::env::var(config_variable)
        .ok()
        .filter(|data| !data.trim().is_empty());

    let (text, format) = match from_env {
        Some(text) => {
            ConfigLoading {
                suite,
                source: config_variable,
            }
            .log();
            (text, ConfigFormat::Yaml)
        }
        None => {
            let path = config_file.as_ref();
            let source = path.display().to_string();
            ConfigLoading {
                suite,
                source: &source,
            }
            .log();
            let text = fs::read_to_string(path).map_err(|source_err| ConfigError::Io {
                source_name: source.clone(),
                source: source_err,
            })?;
            (text, ConfigFormat::from_path(path))
        }
    };

    parse_suite(&text, format, suite)
}

/// Parse a config document, substitute `@NAME` environment references and
/// select `suite`.
pub fn parse_suite(text: &str, format: ConfigFormat, suite: &str) -> Result<SuiteConfig, ConfigError> {
    parse_suite_with(text, format, suite, |name| std::env::var(name).ok())
}

/// [`parse_suite`] with an explicit variable lookup.
pub fn parse_suite_with<F>(
    text: &str,
    format: ConfigFormat,
    suite: &str,
    lookup: F,
) -> Result<SuiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let document: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(text)?,
        ConfigFormat::Toml => toml::from_str(text)?,
    };
    let document = substitute_variables(document, &lookup);

    let found = document
        .get(CONFIG_VERSION_KEY)
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if found != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: CURRENT_CONFIG_VERSION,
            found,
        });
    }

    let suites = document
        .get(SUITES_SECTION)
        .ok_or(ConfigError::MissingSuites)?;

    match suites.get(suite) {
        Some(Value::Mapping(tree)) if !tree.is_empty() => Ok(SuiteConfig::new(suite, tree.clone())),
        _ => Err(ConfigError::UnknownSuite(suite.to_string())),
    }
}

/// Replace every string (key or value) of the form `@NAME` with the value
/// of environment variable `NAME`, when it is set.
pub fn substitute_variables<F>(value: Value, lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    (
                        substitute_variables(key, lookup),
                        substitute_variables(value, lookup),
                    )
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| substitute_variables(item, lookup))
                .collect(),
        ),
        Value::String(text) => match variable_reference(&text).and_then(lookup) {
            Some(replacement) => Value::String(replacement),
            None => Value::String(text),
        },
        other => other,
    }
}

/// `@NAME` -> `NAME` when `NAME` is a valid identifier.
fn variable_reference(text: &str) -> Option<&str> {
    let name = text.strip_prefix('@')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}
