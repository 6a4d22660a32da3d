// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed reads from a unit's merged options.

use serde_yaml::Value;

use crate::errors::ConfigError;
use crate::model::{Options, Severity};

pub fn string(options: &Options, key: &str) -> Result<Option<String>, ConfigError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(_) => Err(ConfigError::invalid_option(key, "expected a string")),
    }
}

pub fn required_string(options: &Options, key: &str) -> Result<String, ConfigError> {
    string(options, key)?.ok_or_else(|| ConfigError::invalid_option(key, "option is required"))
}

pub fn string_list(options: &Options, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ConfigError::invalid_option(key, "expected a list of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        // A single value is a list of one
        Some(Value::String(text)) => Ok(Some(vec![text.clone()])),
        Some(_) => Err(ConfigError::invalid_option(key, "expected a list of strings")),
    }
}

pub fn severity(options: &Options, key: &str) -> Result<Option<Severity>, ConfigError> {
    match string(options, key)? {
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|reason: String| ConfigError::invalid_option(key, reason)),
        None => Ok(None),
    }
}
