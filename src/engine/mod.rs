// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod context;
mod factory_map;
mod performer;
mod pipeline;
mod registry;
pub mod resolver;
mod stage;
#[cfg(test)]
mod integration_tests;

pub use context::{ScheduleRequest, UnitContext};
pub use factory_map::FactoryMap;
pub use performer::{Performer, StageObserver, StageSummary};
pub use pipeline::{Pipeline, RunReport};
pub use registry::{RegisteredUnit, UnitRegistry};
pub use stage::{Stage, UnitPath};
