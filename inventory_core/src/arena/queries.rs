//! Cached capacity, stored and mass queries.
//!
//! Every query follows the same shape: look at the node's cache under its
//! lock, and on a miss remember the cache generation plus whatever local
//! state the recomputation needs. The lock is released while children are
//! asked, then the result is written back only if the generation is
//! unchanged.

use colony_rules::{ItemResourceId, ResourceId, UnitId};
use std::collections::BTreeSet;

use super::Inventories;
use crate::cache::CacheLayer;
use crate::error::InventoryResult;
use crate::node::InventoryNode;

enum Lookup<T, S> {
    Hit(T),
    Miss { generation: u64, seed: S },
}

impl Inventories {
    fn lookup<T, S>(
        &self,
        unit: UnitId,
        hit: impl FnOnce(&CacheLayer) -> Option<T>,
        seed: impl FnOnce(&InventoryNode) -> S,
    ) -> InventoryResult<Lookup<T, S>> {
        self.inspect(unit, |node| match hit(&node.cache) {
            Some(value) => Lookup::Hit(value),
            None => Lookup::Miss {
                generation: node.cache.generation(),
                seed: seed(node),
            },
        })
    }

    fn write_back(
        &self,
        unit: UnitId,
        generation: u64,
        write: impl FnOnce(&mut CacheLayer),
    ) -> InventoryResult<()> {
        self.with_node(unit, |node| {
            if node.cache.generation() == generation {
                write(&mut node.cache);
            } else {
                tracing::trace!(unit = %unit, "discarded stale recomputation");
            }
        })
    }

    fn is_accepting(&self, unit: UnitId, resource: ResourceId) -> InventoryResult<bool> {
        self.inspect(unit, |node| node.is_accepting_container(resource))
    }

    /// Total of `resource` held by the unit, including containers inside it
    /// that are committed to `resource` or still uncommitted.
    pub fn stored_amount(
        &self,
        unit: UnitId,
        resource: ResourceId,
        allow_dirty: bool,
    ) -> InventoryResult<f64> {
        let lookup = self.lookup(
            unit,
            |cache| cache.stored.get(resource, allow_dirty),
            |node| (node.amounts().stored(resource), node.contents().as_slice().to_vec()),
        )?;
        let (generation, (local, children)) = match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { generation, seed } => (generation, seed),
        };

        let mut total = local;
        for child in children {
            if self.is_accepting(child, resource)? {
                total += self.stored_amount(child, resource, false)?;
            }
        }
        self.write_back(unit, generation, |cache| cache.stored.set(resource, total))?;
        Ok(total)
    }

    /// Capacity for `resource`: the unit's own pools plus what accepting
    /// containers inside it already hold and can still take.
    ///
    /// The still-free part of those containers is capped by the unit's own
    /// remaining general capacity, since whatever goes into them adds to the
    /// unit's load. A container committed to another resource has none.
    pub fn capacity(&self, unit: UnitId, resource: ResourceId, allow_dirty: bool) -> InventoryResult<f64> {
        let phase = self.phase_of(resource)?;
        let lookup = self.lookup(
            unit,
            |cache| cache.capacity.get(resource, allow_dirty),
            |node| {
                let children = if node.is_container() && !node.is_accepting_container(resource) {
                    Vec::new()
                } else {
                    node.contents().as_slice().to_vec()
                };
                (node.local_capacity(resource, phase), children)
            },
        )?;
        let (generation, (local, children)) = match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { generation, seed } => (generation, seed),
        };

        let mut held = 0.0;
        let mut room = 0.0;
        for child in children {
            if !self.is_accepting(child, resource)? {
                continue;
            }
            let child_capacity = self.capacity(child, resource, false)?;
            let child_stored = self.stored_amount(child, resource, false)?;
            held += child_stored;
            room += (child_capacity - child_stored).max(0.0);
        }
        if room > 0.0 {
            room = room.min(self.remaining_general_capacity(unit, false)?);
        }

        let total = local + held + room;
        self.write_back(unit, generation, |cache| cache.capacity.set(resource, total))?;
        Ok(total)
    }

    /// Room left for `resource`.
    ///
    /// With `use_contained_units` the room of accepting containers inside the
    /// unit counts; otherwise only the unit's own pools do. Either way a unit
    /// that is itself contained can never take more than its container's
    /// remaining general capacity, and a container nested in a container
    /// committed to another resource has no room at all.
    pub fn remaining_capacity(
        &self,
        unit: UnitId,
        resource: ResourceId,
        use_contained_units: bool,
        allow_dirty: bool,
    ) -> InventoryResult<f64> {
        let phase = self.phase_of(resource)?;
        if !self.holders_accept(unit, resource)? {
            return Ok(0.0);
        }
        let raw = if use_contained_units {
            let capacity = self.capacity(unit, resource, allow_dirty)?;
            let stored = self.stored_amount(unit, resource, allow_dirty)?;
            (capacity - stored).max(0.0)
        } else {
            self.inspect(unit, |node| node.local_remaining(resource, phase))?
        };

        match self.container(unit)? {
            Some(parent) => Ok(raw.min(self.remaining_general_capacity(parent, allow_dirty)?)),
            None => Ok(raw),
        }
    }

    /// General capacity not taken by contained units or items.
    pub fn remaining_general_capacity(&self, unit: UnitId, allow_dirty: bool) -> InventoryResult<f64> {
        let (general, items) =
            self.inspect(unit, |node| (node.general_capacity_kg(), node.items().total_mass(&self.catalog)))?;
        let units = self.total_unit_mass(unit, allow_dirty)?;
        Ok((general - units - items).max(0.0))
    }

    /// Mass of the amount resources stored in the unit's own pools.
    pub fn total_resource_mass(&self, unit: UnitId, allow_dirty: bool) -> InventoryResult<f64> {
        self.with_node(unit, |node| node.cached_resource_mass(allow_dirty))
    }

    /// Total mass of every unit directly inside this one, each with its contents.
    pub fn total_unit_mass(&self, unit: UnitId, allow_dirty: bool) -> InventoryResult<f64> {
        let lookup = self.lookup(
            unit,
            |cache| cache.unit_mass.get(allow_dirty),
            |node| node.contents().as_slice().to_vec(),
        )?;
        let (generation, children) = match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { generation, seed } => (generation, seed),
        };

        let mut total = 0.0;
        for child in children {
            total += self.total_mass(child, false)?;
        }
        self.write_back(unit, generation, |cache| cache.unit_mass.set(total))?;
        Ok(total)
    }

    /// Resource mass plus unit mass plus item mass.
    pub fn total_inventory_mass(&self, unit: UnitId, allow_dirty: bool) -> InventoryResult<f64> {
        let lookup = self.lookup(unit, |cache| cache.inventory_mass.get(allow_dirty), |_| ())?;
        let generation = match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { generation, .. } => generation,
        };

        let total = self.total_resource_mass(unit, false)?
            + self.total_unit_mass(unit, false)?
            + self.item_mass(unit)?;
        self.write_back(unit, generation, |cache| cache.inventory_mass.set(total))?;
        Ok(total)
    }

    /// The unit's own mass plus everything inside it.
    pub fn total_mass(&self, unit: UnitId, allow_dirty: bool) -> InventoryResult<f64> {
        let base = self.inspect(unit, InventoryNode::base_mass_kg)?;
        Ok(base + self.total_inventory_mass(unit, allow_dirty)?)
    }

    /// Mass of the items held directly by the unit.
    pub fn item_mass(&self, unit: UnitId) -> InventoryResult<f64> {
        self.inspect(unit, |node| node.items().total_mass(&self.catalog))
    }

    /// Amount resources held locally, plus the committed resource of every
    /// container directly inside the unit.
    pub fn all_resources_present(
        &self,
        unit: UnitId,
        allow_dirty: bool,
    ) -> InventoryResult<BTreeSet<ResourceId>> {
        let lookup = self.lookup(
            unit,
            |cache| cache.resources_present.get(allow_dirty),
            |node| {
                let local: BTreeSet<_> = node
                    .amounts()
                    .resources()
                    .filter(|(_, kg)| *kg > 0.0)
                    .map(|(id, _)| id)
                    .collect();
                (local, node.contents().as_slice().to_vec())
            },
        )?;
        let (generation, (mut present, children)) = match lookup {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { generation, seed } => (generation, seed),
        };

        for child in children {
            let committed = self.inspect(child, InventoryNode::committed_resource)?;
            present.extend(committed);
        }
        let result = present.clone();
        self.write_back(unit, generation, |cache| cache.resources_present.set(present))?;
        Ok(result)
    }

    /// Amount of `resource` in the unit's own pools only.
    pub fn local_stored(&self, unit: UnitId, resource: ResourceId) -> InventoryResult<f64> {
        self.inspect(unit, |node| node.amounts().stored(resource))
    }

    pub fn item_count(&self, unit: UnitId, item: ItemResourceId) -> InventoryResult<u32> {
        self.inspect(unit, |node| node.items().count(item))
    }

    /// Check if nothing inside the unit weighs anything.
    pub fn is_inventory_empty(&self, unit: UnitId) -> InventoryResult<bool> {
        Ok(self.total_inventory_mass(unit, false)? <= self.config.empty_threshold_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKind;
    use crate::config::InventoryConfig;
    use colony_rules::{PhaseType, ResourceCatalog, UnitKind, UnitProfile};
    use std::sync::Arc;

    const OXYGEN: ResourceId = ResourceId(1);
    const WATER: ResourceId = ResourceId(2);
    const WRENCH: ItemResourceId = ItemResourceId(10);

    fn inventories() -> Inventories {
        let catalog = ResourceCatalog::new()
            .with_amount(1, "oxygen", PhaseType::Gas)
            .unwrap()
            .with_amount(2, "water", PhaseType::Liquid)
            .unwrap()
            .with_item(10, "wrench", 0.5)
            .unwrap();
        Inventories::new(Arc::new(catalog), InventoryConfig::default())
    }

    #[test]
    fn test_empty_node() {
        let inv = inventories();
        let base = inv
            .register(&UnitProfile::new("Base", UnitKind::Settlement).with_base_mass(300.0))
            .unwrap();

        assert_eq!(inv.stored_amount(base, OXYGEN, false).unwrap(), 0.0);
        assert_eq!(inv.capacity(base, OXYGEN, false).unwrap(), 0.0);
        assert_eq!(inv.total_inventory_mass(base, false).unwrap(), 0.0);
        assert_eq!(inv.total_mass(base, false).unwrap(), 300.0);
        assert!(inv.all_resources_present(base, false).unwrap().is_empty());
        assert!(inv.is_inventory_empty(base).unwrap());
    }

    #[test]
    fn test_query_caches_result() {
        let inv = inventories();
        let base = inv
            .register(&UnitProfile::new("Base", UnitKind::Settlement).with_type_capacity(OXYGEN, 40.0))
            .unwrap();

        assert!(inv.is_cache_dirty(base, CacheKind::Capacity(OXYGEN)).unwrap());
        assert_eq!(inv.capacity(base, OXYGEN, false).unwrap(), 40.0);
        assert!(!inv.is_cache_dirty(base, CacheKind::Capacity(OXYGEN)).unwrap());
        assert_eq!(inv.capacity(base, OXYGEN, true).unwrap(), 40.0);
    }

    #[test]
    fn test_unknown_resource_capacity() {
        let inv = inventories();
        let base = inv.register(&UnitProfile::new("Base", UnitKind::Settlement)).unwrap();
        assert!(inv.capacity(base, ResourceId(77), false).is_err());
    }

    #[test]
    fn test_uncommitted_bag_counts_for_every_resource() {
        let inv = inventories();
        let base = inv
            .register(&UnitProfile::new("Base", UnitKind::Settlement).with_general_capacity(100.0))
            .unwrap();
        let bag = inv
            .register(
                &UnitProfile::new("Bag", UnitKind::Equipment)
                    .with_base_mass(1.0)
                    .as_container(10.0),
            )
            .unwrap();
        inv.contain_unit(base, bag).unwrap();

        assert_eq!(inv.capacity(base, OXYGEN, false).unwrap(), 10.0);
        assert_eq!(inv.capacity(base, WATER, false).unwrap(), 10.0);
        assert_eq!(inv.total_unit_mass(base, false).unwrap(), 1.0);
        assert_eq!(inv.remaining_general_capacity(base, false).unwrap(), 99.0);
        assert!(!inv.is_inventory_empty(base).unwrap());
    }

    #[test]
    fn test_child_room_clipped_by_general_capacity() {
        let inv = inventories();
        let rover = inv
            .register(&UnitProfile::new("Rover", UnitKind::Vehicle).with_general_capacity(6.0))
            .unwrap();
        let tank = inv
            .register(&UnitProfile::new("Tank", UnitKind::Equipment).as_container(10.0))
            .unwrap();
        inv.contain_unit(rover, tank).unwrap();

        assert_eq!(inv.capacity(rover, WATER, false).unwrap(), 6.0);
        assert_eq!(inv.remaining_capacity(tank, WATER, false, false).unwrap(), 6.0);
    }

    #[test]
    fn test_item_mass_counts_against_general() {
        let inv = inventories();
        let person = inv
            .register(&UnitProfile::new("Person", UnitKind::Person).with_general_capacity(10.0))
            .unwrap();
        let _ = inv.store_item_resource(person, WRENCH, 4).unwrap();

        assert_eq!(inv.item_mass(person).unwrap(), 2.0);
        assert_eq!(inv.total_inventory_mass(person, false).unwrap(), 2.0);
        assert_eq!(inv.remaining_general_capacity(person, false).unwrap(), 8.0);
        assert_eq!(inv.item_count(person, WRENCH).unwrap(), 4);
    }
}
