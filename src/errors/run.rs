// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::engine::Stage;
use crate::errors::{ConfigError, ResolveError};

/// Failures that end a pipeline run. Unit failures never do.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{stage} aborted: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: ResolveError,
    },
}

impl RunError {
    pub fn stage(stage: Stage, source: ResolveError) -> Self {
        RunError::Stage { stage, source }
    }
}
