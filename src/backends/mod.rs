// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Unit implementations for The Dustpan pipeline.
//!
//! Every unit type is a [`UnitFactory`](crate::traits::UnitFactory) paired
//! with the [`Unit`](crate::traits::Unit) it builds. Applications register
//! the factories they want in a [`FactoryMap`](crate::engine::FactoryMap);
//! nothing is discovered from the filesystem.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Generic in-process units:
//! - **Scanning**: `import.replay` replays findings from a file or inline list
//! - **Processing**: `false_positive`, `deduplicate`, `severity_filter`
//! - **Reporting**: `console`, `json_file`, and `fanout` (schedules other
//!   reporters mid-pass)
//!
//! Tool-specific scanners and ticketing or mail reporters live outside this
//! crate and plug in through the same factory map.
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities for performer development (only available in test builds):
//! - **NoopUnit**: does nothing, for registry and resolver tests
//! - **StubFactory**: configurable dependencies, failures, scheduling and
//!   emitted findings, with a shared journal of what ran
//!
//! # Examples
//!
//! ```rust
//! use the_dustpan::backends::local::LocalUnitFactory;
//! use the_dustpan::engine::Stage;
//!
//! let factories = LocalUnitFactory::factory_map();
//! let replay = factories.get(Stage::Scanning, "import.replay").unwrap();
//! assert_eq!(replay.descriptor().name, "replay");
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
