// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod resolve;
mod run;
mod unit;

pub use config::ConfigError;
pub use resolve::ResolveError;
pub use run::RunError;
pub use unit::UnitError;
