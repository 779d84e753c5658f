//! Containment set - the units physically inside a node.

use colony_rules::UnitId;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of contained unit IDs.
///
/// Order matters: store and retrieve visit children in the order they were
/// contained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentSet {
    units: Vec<UnitId>,
}

impl ContainmentSet {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit. Returns false if it was already present.
    pub fn insert(&mut self, unit: UnitId) -> bool {
        if self.contains(unit) {
            return false;
        }
        self.units.push(unit);
        true
    }

    /// Remove a unit. Returns false if it was absent.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        match self.units.iter().position(|u| *u == unit) {
            Some(index) => {
                self.units.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().copied()
    }

    pub fn as_slice(&self) -> &[UnitId] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
