//! Unit definitions for the colony.

mod components;
mod unit;

pub use components::*;
pub use unit::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every unit that can hold or be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    /// Create a new random unit ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a unit ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil unit ID (useful for defaults and fixtures).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad categories of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Settlement,
    Vehicle,
    Person,
    Robot,
    Equipment,
    Building,
}
