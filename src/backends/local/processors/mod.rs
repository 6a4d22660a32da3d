// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod deduplicate;
pub mod false_positive;
pub mod severity_filter;

pub use deduplicate::*;
pub use false_positive::*;
pub use severity_filter::*;
