// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::UnitContext;
use crate::model::{ErrorRecord, Finding};

/// A runtime instance of a pluggable scanner, processor or reporter.
///
/// Instances are built by a [`UnitFactory`](crate::traits::UnitFactory) from
/// their merged configuration and are owned by the stage's registry. A unit
/// never sees the registry itself; its only way back into the performer is
/// the [`UnitContext`] handed to [`execute`](Unit::execute).
///
/// Everything except `execute` has a default so simple units stay small.
#[async_trait]
pub trait Unit: Send + Sync {
    /// Perform the unit's action. An `Err` is recorded against the unit and
    /// the stage carries on with the next unit.
    async fn execute(&mut self, ctx: &mut UnitContext<'_>) -> anyhow::Result<()>;

    /// Output accumulated by this unit, aggregated by the next stage.
    fn results(&self) -> &[Finding] {
        &[]
    }

    /// Failures the unit recorded itself without aborting its action.
    fn errors(&self) -> &[ErrorRecord] {
        &[]
    }

    /// Small named values other components may query.
    fn meta(&self, _key: &str) -> Option<&serde_yaml::Value> {
        None
    }

    /// Scanning pass started. Only delivered to reporting units.
    fn on_start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Scanning pass finished. Only delivered to reporting units.
    fn on_finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// A scanner identified by its registry key is about to run.
    fn on_unit_start(&mut self, _unit: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// A scanner identified by its registry key has finished.
    fn on_unit_finish(&mut self, _unit: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
