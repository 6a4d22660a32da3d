// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for suite configuration loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Suite configuration is being loaded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoading<'a> {
    pub suite: &'a str,
    /// File path or environment variable name.
    pub source: &'a str,
}

impl Display for ConfigLoading<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loading {} config from {}", self.suite, self.source)
    }
}

impl StructuredLog for ConfigLoading<'_> {
    fn log(&self) {
        tracing::info!(suite = self.suite, source = self.source, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loading",
            span_name = name,
            suite = self.suite,
            source = self.source,
        )
    }
}

/// Suite configuration was rejected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConfigRejected<'a> {
    pub suite: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid {} config: {}", self.suite, self.error)
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(suite = self.suite, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            suite = self.suite,
            error = %self.error,
        )
    }
}
