// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::{Unit, UnitDescriptor};

/// A unit instance together with the key it was registered under and the
/// static dependency facts of its type.
pub struct RegisteredUnit {
    pub key: String,
    pub descriptor: UnitDescriptor,
    pub unit: Box<dyn Unit>,
}

impl std::fmt::Debug for RegisteredUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredUnit")
            .field("key", &self.key)
            .field("name", &self.descriptor.name)
            .finish()
    }
}

/// Insertion-ordered mapping from registry key to unit instance.
///
/// Keys are unique. Iteration order is the current best-known execution
/// order; the resolver rewrites it in place via [`UnitRegistry::apply_order`]
/// without replacing any instance.
#[derive(Debug, Default)]
pub struct UnitRegistry(Vec<RegisteredUnit>);

impl UnitRegistry {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a unit. Returns `false` and drops nothing if the key is taken.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        descriptor: UnitDescriptor,
        unit: Box<dyn Unit>,
    ) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.0.push(RegisteredUnit {
            key,
            descriptor,
            unit,
        });
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<RegisteredUnit> {
        let index = self.position(key)?;
        Some(self.0.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&RegisteredUnit> {
        self.0.iter().find(|entry| entry.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RegisteredUnit> {
        self.0.iter_mut().find(|entry| entry.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|entry| &entry.key)
    }

    pub fn descriptors(&self) -> Vec<&UnitDescriptor> {
        self.0.iter().map(|entry| &entry.descriptor).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredUnit> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegisteredUnit> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Move every entry to the end in the order given by `order`, a
    /// permutation of current positions.
    pub(crate) fn apply_order(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.0.len());
        let mut slots: Vec<Option<RegisteredUnit>> = self.0.drain(..).map(Some).collect();
        self.0 = order.iter().filter_map(|&index| slots[index].take()).collect();
        // Anything the permutation missed keeps its relative position at the tail.
        self.0.extend(slots.into_iter().flatten());
    }
}
