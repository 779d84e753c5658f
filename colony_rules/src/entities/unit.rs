//! Unit blueprints.

use serde::{Deserialize, Serialize};

use super::{ContainerSpec, StorageComponent, UnitId, UnitKind};
use crate::mechanics::{PhaseType, ResourceId};

/// Everything the inventory engine needs to know to create a unit's node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitProfile {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    /// Mass of the unit itself when empty, in kg.
    pub base_mass_kg: f64,
    pub storage: StorageComponent,
}

impl UnitProfile {
    /// Create a new massless profile with no storage.
    pub fn new(name: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            kind,
            base_mass_kg: 0.0,
            storage: StorageComponent::default(),
        }
    }

    /// Use a specific unit ID.
    pub fn with_id(mut self, id: UnitId) -> Self {
        self.id = id;
        self
    }

    /// Set the empty mass of the unit.
    pub fn with_base_mass(mut self, kg: f64) -> Self {
        self.base_mass_kg = kg;
        self
    }

    /// Set the general mass budget for items and contained units.
    pub fn with_general_capacity(mut self, kg: f64) -> Self {
        self.storage.general_capacity_kg = kg;
        self
    }

    /// Add capacity dedicated to one amount resource.
    pub fn with_type_capacity(mut self, resource: ResourceId, kg: f64) -> Self {
        *self.storage.type_capacity.entry(resource).or_insert(0.0) += kg;
        self
    }

    /// Add capacity shared by every amount resource of a phase.
    pub fn with_phase_capacity(mut self, phase: PhaseType, kg: f64) -> Self {
        *self.storage.phase_capacity.entry(phase).or_insert(0.0) += kg;
        self
    }

    /// Give the unit a single-resource container capability.
    pub fn as_container(mut self, capacity_kg: f64) -> Self {
        self.storage.container = Some(ContainerSpec { capacity_kg });
        self
    }
}
