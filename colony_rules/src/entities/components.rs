//! Component definitions for units.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mechanics::{PhaseType, ResourceId};

/// Storage component for units that can hold resources or other units.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageComponent {
    /// Mass budget for items and contained units, in kg.
    pub general_capacity_kg: f64,
    /// Capacity reserved for one specific amount resource, in kg.
    pub type_capacity: HashMap<ResourceId, f64>,
    /// Capacity shared by every amount resource of a phase, in kg.
    pub phase_capacity: HashMap<PhaseType, f64>,
    /// Present when the unit can be committed to one amount resource at a time.
    pub container: Option<ContainerSpec>,
}

/// Blueprint of a single-resource container (bag, canister, barrel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Mass of whichever amount resource the container gets committed to, in kg.
    pub capacity_kg: f64,
}
