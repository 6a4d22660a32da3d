// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for diagnostic and operational
//! logging throughout the pipeline. Message types follow a struct-based pattern
//! with `Display` implementations so that:
//!
//! * Log text lives in one place instead of being scattered through the engine
//! * Every event carries the same structured fields wherever it is emitted
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::config` - suite configuration loading
//! * `messages::resolver` - dependency resolution outcomes
//! * `messages::stage` - performer lifecycle (prepare, perform, observe)
//! * `messages::unit` - per-unit preparation, execution and scheduling
//!
//! # Usage
//!
//! ```rust
//! use the_dustpan::observability::messages::{unit::UnitExecutionStarted, StructuredLog};
//!
//! let msg = UnitExecutionStarted {
//!     stage: "scanning",
//!     unit: "dast.zap",
//!     description: "OWASP ZAP",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
