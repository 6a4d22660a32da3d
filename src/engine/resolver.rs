// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency resolution for a stage's unit registry.
//!
//! Units declare two kinds of ordering relationships by *declared name*
//! (which need not equal the registry key):
//!
//! * `depends_on` - must be registered in the stage and must run first
//! * `run_after` - runs first when registered, silently ignored otherwise
//!
//! # Algorithm
//!
//! Depth-first topological sort with an explicit recursion stack:
//!
//! 1. Map every declared name to the registry positions declaring it
//! 2. Reject any required dependency that is not in the map
//! 3. Walk units in registry order; before emitting a unit, visit its
//!    required dependencies and its present optional dependencies. Reaching
//!    a unit that is still on the recursion stack is a cycle.
//! 4. Apply the emitted order to the registry
//!
//! **Time Complexity**: O(V + E)
//! **Space Complexity**: O(V)
//!
//! Units that no edge constrains keep their relative registry order, so the
//! same configuration always yields the same order, and resolving an
//! already-resolved registry is a no-op.
//!
//! # Example
//!
//! ```rust
//! use the_dustpan::engine::resolver::resolve_order;
//! use the_dustpan::traits::UnitDescriptor;
//!
//! let c = UnitDescriptor::new("c", "").run_after(["b"]);
//! let a = UnitDescriptor::new("a", "");
//! let b = UnitDescriptor::new("b", "").depends_on(["a"]);
//!
//! // Registered as [c, a, b], resolved to [a, b, c].
//! let order = resolve_order(&[&c, &a, &b]).unwrap();
//! assert_eq!(order, vec![1, 2, 0]);
//! ```

use std::collections::HashMap;

use crate::engine::UnitRegistry;
use crate::errors::ResolveError;
use crate::traits::UnitDescriptor;

/// Reorder `registry` so every unit follows its dependencies.
///
/// On error the registry is left untouched.
pub fn resolve(registry: &mut UnitRegistry) -> Result<(), ResolveError> {
    let order = resolve_order(&registry.descriptors())?;
    registry.apply_order(&order);
    Ok(())
}

/// Compute an execution order over `units`, returned as positions into the
/// input slice.
pub fn resolve_order(units: &[&UnitDescriptor]) -> Result<Vec<usize>, ResolveError> {
    // Several units may declare one name; a dependent follows all of them.
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, unit) in units.iter().enumerate() {
        by_name.entry(unit.name.as_str()).or_default().push(index);
    }

    for unit in units {
        for dependency in &unit.depends_on {
            if !by_name.contains_key(dependency.as_str()) {
                return Err(ResolveError::MissingDependency {
                    dependency: dependency.clone(),
                    required_by: unit.name.clone(),
                });
            }
        }
    }

    let mut walk = Walk {
        units,
        by_name: &by_name,
        on_stack: vec![false; units.len()],
        ordered: vec![false; units.len()],
        path: Vec::new(),
        order: Vec::with_capacity(units.len()),
    };

    for index in 0..units.len() {
        walk.visit(index)?;
    }

    Ok(walk.order)
}

struct Walk<'a> {
    units: &'a [&'a UnitDescriptor],
    by_name: &'a HashMap<&'a str, Vec<usize>>,
    /// Gray nodes: currently being visited.
    on_stack: Vec<bool>,
    /// Black nodes: already emitted.
    ordered: Vec<bool>,
    path: Vec<usize>,
    order: Vec<usize>,
}

impl Walk<'_> {
    fn visit(&mut self, index: usize) -> Result<(), ResolveError> {
        if self.ordered[index] {
            return Ok(());
        }

        self.on_stack[index] = true;
        self.path.push(index);

        for dependency in self.edges(index) {
            if self.on_stack[dependency] {
                return Err(self.cycle(index, dependency));
            }
            self.visit(dependency)?;
        }

        self.path.pop();
        self.on_stack[index] = false;
        self.ordered[index] = true;
        self.order.push(index);
        Ok(())
    }

    /// Required dependencies first, then optional ones that are present.
    fn edges(&self, index: usize) -> Vec<usize> {
        let unit = self.units[index];
        unit.depends_on
            .iter()
            .chain(unit.run_after.iter())
            .filter_map(|name| self.by_name.get(name.as_str()))
            .flatten()
            .copied()
            .collect()
    }

    fn cycle(&self, index: usize, dependency: usize) -> ResolveError {
        let start = self
            .path
            .iter()
            .position(|&node| node == dependency)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|&node| self.units[node].name.clone())
            .collect();
        cycle.push(self.units[dependency].name.clone());

        ResolveError::CircularDependency {
            unit: self.units[index].name.clone(),
            dependency: self.units[dependency].name.clone(),
            cycle,
        }
    }
}
