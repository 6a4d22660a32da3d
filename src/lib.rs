// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // built-in units
pub mod config;        // suite config + merge
pub mod engine;        // resolver, performers, pipeline
pub mod errors;        // error handling
pub mod model;         // findings and error records
pub mod observability;
pub mod traits;        // unit capability contract
