//! Cache layer - dirty-flagged answers to a node's capacity, stored and mass queries.
//!
//! The layer holds six families:
//! - **capacity** per amount resource (local pools plus accepting containers)
//! - **stored** per amount resource (local plus accepting containers)
//! - **resources present**
//! - **resource mass** (locally stored amount resources)
//! - **unit mass** (contained units, each with everything inside it)
//! - **inventory mass** (resource + unit + item mass)
//!
//! None of it is persisted. A node that was just loaded starts with every
//! entry dirty.

mod entry;

pub use entry::*;

use colony_rules::ResourceId;
use std::collections::BTreeSet;

/// A cache family, or one resource's entry within a per-resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Capacity(ResourceId),
    CapacityAll,
    Stored(ResourceId),
    StoredAll,
    ResourcesPresent,
    ResourceMass,
    UnitMass,
    InventoryMass,
}

impl CacheKind {
    /// Entries of the container that go stale when this entry goes stale in a contained unit.
    ///
    /// A contained unit's stored amount feeds both the container's stored total
    /// and its capacity; any change of the unit's total mass moves the
    /// container's unit mass, its grand total, and the general room that
    /// clips every capacity.
    pub fn lift(self, out: &mut Vec<CacheKind>) {
        match self {
            CacheKind::Capacity(r) => out.push(CacheKind::Capacity(r)),
            CacheKind::CapacityAll => out.push(CacheKind::CapacityAll),
            CacheKind::Stored(r) => {
                out.push(CacheKind::Stored(r));
                out.push(CacheKind::Capacity(r));
            }
            CacheKind::StoredAll => {
                out.push(CacheKind::StoredAll);
                out.push(CacheKind::CapacityAll);
            }
            CacheKind::ResourcesPresent => out.push(CacheKind::ResourcesPresent),
            CacheKind::ResourceMass | CacheKind::UnitMass => out.push(CacheKind::UnitMass),
            CacheKind::InventoryMass => {
                out.push(CacheKind::UnitMass);
                out.push(CacheKind::InventoryMass);
                out.push(CacheKind::CapacityAll);
            }
        }
    }

    /// Lift a whole set one level up, without duplicates.
    pub fn lift_all(kinds: &[CacheKind]) -> Vec<CacheKind> {
        let mut out = Vec::with_capacity(kinds.len() + 2);
        for kind in kinds {
            kind.lift(&mut out);
        }
        let mut unique = Vec::with_capacity(out.len());
        for kind in out {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        unique
    }
}

/// The six cache families of one node.
#[derive(Debug, Clone, Default)]
pub struct CacheLayer {
    pub capacity: PerResourceCache,
    pub stored: PerResourceCache,
    pub resources_present: CacheEntry<BTreeSet<ResourceId>>,
    pub resource_mass: CacheEntry<f64>,
    pub unit_mass: CacheEntry<f64>,
    pub inventory_mass: CacheEntry<f64>,
    generation: u64,
}

impl CacheLayer {
    /// Cache layer with per-resource entries for every catalog resource.
    pub fn primed(resources: impl IntoIterator<Item = ResourceId> + Clone) -> Self {
        Self {
            capacity: PerResourceCache::primed(resources.clone()),
            stored: PerResourceCache::primed(resources),
            ..Self::default()
        }
    }

    /// Counter bumped by every invalidation.
    ///
    /// A recomputation that read children without holding this node's lock
    /// only writes its result back if the generation has not moved.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn invalidate(&mut self, kind: CacheKind) {
        self.generation = self.generation.wrapping_add(1);
        match kind {
            CacheKind::Capacity(r) => self.capacity.mark_dirty(r),
            CacheKind::CapacityAll => self.capacity.mark_all_dirty(),
            CacheKind::Stored(r) => self.stored.mark_dirty(r),
            CacheKind::StoredAll => self.stored.mark_all_dirty(),
            CacheKind::ResourcesPresent => self.resources_present.mark_dirty(),
            CacheKind::ResourceMass => self.resource_mass.mark_dirty(),
            CacheKind::UnitMass => self.unit_mass.mark_dirty(),
            CacheKind::InventoryMass => self.inventory_mass.mark_dirty(),
        }
    }

    /// Mark every entry dirty.
    pub fn invalidate_all(&mut self) {
        for kind in [
            CacheKind::CapacityAll,
            CacheKind::StoredAll,
            CacheKind::ResourcesPresent,
            CacheKind::ResourceMass,
            CacheKind::UnitMass,
            CacheKind::InventoryMass,
        ] {
            self.invalidate(kind);
        }
    }

    /// Check if an entry is dirty. For a whole family, whether any of its entries is.
    pub fn is_dirty(&self, kind: CacheKind) -> bool {
        match kind {
            CacheKind::Capacity(r) => self.capacity.is_dirty(r),
            CacheKind::CapacityAll => self.capacity.any_dirty(),
            CacheKind::Stored(r) => self.stored.is_dirty(r),
            CacheKind::StoredAll => self.stored.any_dirty(),
            CacheKind::ResourcesPresent => self.resources_present.is_dirty(),
            CacheKind::ResourceMass => self.resource_mass.is_dirty(),
            CacheKind::UnitMass => self.unit_mass.is_dirty(),
            CacheKind::InventoryMass => self.inventory_mass.is_dirty(),
        }
    }
}
