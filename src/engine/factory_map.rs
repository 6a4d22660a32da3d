// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::Stage;
use crate::traits::UnitFactory;

/// Registry of unit types available to the performers, keyed by stage and
/// config path (`dast.zap`, `html`).
///
/// Supplied by the surrounding application; nothing is discovered at runtime.
///
/// # Examples
///
/// ```
/// use the_dustpan::backends::local::LocalUnitFactory;
/// use the_dustpan::engine::{FactoryMap, Stage};
///
/// let factories = LocalUnitFactory::factory_map();
/// assert!(factories.contains(Stage::Processing, "deduplicate"));
/// assert!(!factories.contains(Stage::Scanning, "deduplicate"));
/// ```
#[derive(Clone, Default)]
pub struct FactoryMap(HashMap<(Stage, String), Arc<dyn UnitFactory>>);

impl FactoryMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register a factory, replacing any previous one for the same key.
    pub fn register<F>(&mut self, stage: Stage, path: impl Into<String>, factory: F)
    where
        F: UnitFactory + 'static,
    {
        self.0.insert((stage, path.into()), Arc::new(factory));
    }

    pub fn get(&self, stage: Stage, path: &str) -> Option<Arc<dyn UnitFactory>> {
        self.0.get(&(stage, path.to_string())).cloned()
    }

    pub fn contains(&self, stage: Stage, path: &str) -> bool {
        self.0.contains_key(&(stage, path.to_string()))
    }

    /// Registered paths for one stage, sorted.
    pub fn paths(&self, stage: Stage) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .0
            .keys()
            .filter(|(s, _)| *s == stage)
            .map(|(_, path)| path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for FactoryMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryMap")
            .field("factory_count", &self.0.len())
            .finish()
    }
}
