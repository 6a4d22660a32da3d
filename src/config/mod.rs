// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod stage;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use loader::{
    load_suite, parse_suite, parse_suite_with, substitute_variables, ConfigFormat, SuiteConfig,
};
pub use runtime::RuntimeBuilder;
pub use stage::{merge_options, StageConfig};
