//! Handle scoped to one unit's inventory.

use colony_rules::{ItemResourceId, ResourceId, UnitId};
use std::collections::BTreeSet;

use crate::arena::Inventories;
use crate::cache::CacheKind;
use crate::error::InventoryResult;
use crate::outcome::{RetrieveOutcome, StoreOutcome};

/// Borrowed view of one unit's inventory.
///
/// Every call goes through the owning [`Inventories`], so a handle is just
/// a convenience for code that works on a single unit at a time.
#[derive(Debug, Clone, Copy)]
pub struct InventoryHandle<'a> {
    inventories: &'a Inventories,
    owner: UnitId,
}

impl<'a> InventoryHandle<'a> {
    pub(crate) fn new(inventories: &'a Inventories, owner: UnitId) -> Self {
        Self { inventories, owner }
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    pub fn container(&self) -> InventoryResult<Option<UnitId>> {
        self.inventories.container(self.owner)
    }

    pub fn contained_units(&self) -> InventoryResult<Vec<UnitId>> {
        self.inventories.contained_units(self.owner)
    }

    pub fn store_amount_resource(
        &self,
        resource: ResourceId,
        amount: f64,
        use_contained_units: bool,
    ) -> InventoryResult<StoreOutcome<f64>> {
        self.inventories
            .store_amount_resource(self.owner, resource, amount, use_contained_units)
    }

    pub fn retrieve_amount_resource(
        &self,
        resource: ResourceId,
        amount: f64,
    ) -> InventoryResult<RetrieveOutcome<f64>> {
        self.inventories
            .retrieve_amount_resource(self.owner, resource, amount)
    }

    pub fn store_item_resource(&self, item: ItemResourceId, count: u32) -> InventoryResult<StoreOutcome<u32>> {
        self.inventories.store_item_resource(self.owner, item, count)
    }

    pub fn retrieve_item_resource(
        &self,
        item: ItemResourceId,
        count: u32,
    ) -> InventoryResult<RetrieveOutcome<u32>> {
        self.inventories
            .retrieve_item_resource(self.owner, item, count)
    }

    /// Put `child` inside this unit.
    pub fn contain_unit(&self, child: UnitId) -> InventoryResult<()> {
        self.inventories.contain_unit(self.owner, child)
    }

    /// Take `child` out of this unit.
    pub fn uncontain_unit(&self, child: UnitId) -> InventoryResult<()> {
        self.inventories.uncontain_unit(self.owner, child)
    }

    pub fn can_contain_unit(&self, child: UnitId) -> InventoryResult<bool> {
        self.inventories.can_contain_unit(self.owner, child)
    }

    pub fn stored_amount(&self, resource: ResourceId, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.stored_amount(self.owner, resource, allow_dirty)
    }

    pub fn capacity(&self, resource: ResourceId, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.capacity(self.owner, resource, allow_dirty)
    }

    pub fn remaining_capacity(
        &self,
        resource: ResourceId,
        use_contained_units: bool,
        allow_dirty: bool,
    ) -> InventoryResult<f64> {
        self.inventories
            .remaining_capacity(self.owner, resource, use_contained_units, allow_dirty)
    }

    pub fn remaining_general_capacity(&self, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories
            .remaining_general_capacity(self.owner, allow_dirty)
    }

    pub fn total_resource_mass(&self, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.total_resource_mass(self.owner, allow_dirty)
    }

    pub fn total_unit_mass(&self, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.total_unit_mass(self.owner, allow_dirty)
    }

    pub fn total_inventory_mass(&self, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.total_inventory_mass(self.owner, allow_dirty)
    }

    pub fn total_mass(&self, allow_dirty: bool) -> InventoryResult<f64> {
        self.inventories.total_mass(self.owner, allow_dirty)
    }

    pub fn all_resources_present(&self, allow_dirty: bool) -> InventoryResult<BTreeSet<ResourceId>> {
        self.inventories
            .all_resources_present(self.owner, allow_dirty)
    }

    pub fn local_stored(&self, resource: ResourceId) -> InventoryResult<f64> {
        self.inventories.local_stored(self.owner, resource)
    }

    pub fn item_count(&self, item: ItemResourceId) -> InventoryResult<u32> {
        self.inventories.item_count(self.owner, item)
    }

    pub fn is_empty(&self) -> InventoryResult<bool> {
        self.inventories.is_inventory_empty(self.owner)
    }

    pub fn is_cache_dirty(&self, kind: CacheKind) -> InventoryResult<bool> {
        self.inventories.is_cache_dirty(self.owner, kind)
    }
}
