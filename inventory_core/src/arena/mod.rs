//! Inventories - the arena owning every node, keyed by unit id.
//!
//! Each node sits behind its own mutex so that separate trees (one per
//! settlement, say) can be worked on from different threads. No operation
//! holds two node locks at once: a query that needs its children collects
//! their ids, releases the node, asks the children, then re-locks to write
//! the cache back. The write is dropped if an invalidation slipped in
//! meanwhile, so a stale value is never marked clean.

mod commitment;
mod containment;
mod invalidate;
mod queries;
mod transfer;

use colony_rules::{PhaseType, ResourceCatalog, ResourceId, ResourceKey, UnitId, UnitProfile};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheKind, CacheLayer};
use crate::config::InventoryConfig;
use crate::directory::UnitDirectory;
use crate::error::{check_amount, InventoryError, InventoryResult};
use crate::events::{ChangeKind, NullListener, ResourceChange, ResourceChangeListener};
use crate::handle::InventoryHandle;
use crate::node::InventoryNode;

type Slot = Arc<Mutex<InventoryNode>>;

/// Every inventory node in the simulation.
pub struct Inventories {
    nodes: RwLock<HashMap<UnitId, Slot>>,
    catalog: Arc<ResourceCatalog>,
    config: InventoryConfig,
    listener: Arc<dyn ResourceChangeListener>,
}

impl Inventories {
    /// Create an empty arena.
    pub fn new(catalog: Arc<ResourceCatalog>, config: InventoryConfig) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            catalog,
            config,
            listener: Arc::new(NullListener),
        }
    }

    /// Route change notifications to `listener`.
    pub fn with_listener(mut self, listener: Arc<dyn ResourceChangeListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Create the node for a new unit. The node starts empty and uncontained.
    pub fn register(&self, profile: &UnitProfile) -> InventoryResult<UnitId> {
        check_amount(profile.base_mass_kg)?;
        check_amount(profile.storage.general_capacity_kg)?;
        for kg in profile
            .storage
            .type_capacity
            .values()
            .chain(profile.storage.phase_capacity.values())
        {
            check_amount(*kg)?;
        }
        if let Some(spec) = profile.storage.container {
            check_amount(spec.capacity_kg)?;
        }

        let mut node = InventoryNode::from_profile(profile);
        node.cache = CacheLayer::primed(self.catalog.all_resource_ids());

        let mut nodes = self.nodes.write();
        if nodes.contains_key(&profile.id) {
            return Err(InventoryError::DuplicateUnit(profile.id));
        }
        nodes.insert(profile.id, Arc::new(Mutex::new(node)));
        tracing::debug!(unit = %profile.id, name = %profile.name, "registered inventory");
        Ok(profile.id)
    }

    /// Drop a unit's node for good.
    ///
    /// The unit is taken out of its container first. Units it was holding are
    /// left in place but become top-level; releasing them is up to the caller.
    pub fn remove_unit(&self, unit: UnitId) -> InventoryResult<InventoryNode> {
        if let Some(parent) = self.container(unit)? {
            self.uncontain_unit(parent, unit)?;
        }
        let slot = self
            .nodes
            .write()
            .remove(&unit)
            .ok_or(InventoryError::UnknownUnit(unit))?;
        let node = slot.lock().clone();

        for child in node.contents().iter() {
            if let Ok(child_slot) = self.slot(child) {
                child_slot.lock().set_container(None);
            }
        }
        tracing::debug!(unit = %unit, orphaned = node.contents().len(), "removed inventory");
        Ok(node)
    }

    /// Public contract of one unit's inventory.
    pub fn node(&self, unit: UnitId) -> InventoryResult<InventoryHandle<'_>> {
        self.slot(unit)?;
        Ok(InventoryHandle::new(self, unit))
    }

    /// Read a node's authoritative data.
    pub fn inspect<R>(&self, unit: UnitId, f: impl FnOnce(&InventoryNode) -> R) -> InventoryResult<R> {
        let slot = self.slot(unit)?;
        let node = slot.lock();
        Ok(f(&node))
    }

    /// Every registered unit, in id order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<_> = self.nodes.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Units not held by anything, in id order. Each one roots an independent tree.
    pub fn top_level_units(&self) -> Vec<UnitId> {
        self.unit_ids()
            .into_iter()
            .filter(|id| matches!(self.container(*id), Ok(None)))
            .collect()
    }

    /// Check if a cache entry of a node is currently dirty.
    pub fn is_cache_dirty(&self, unit: UnitId, kind: CacheKind) -> InventoryResult<bool> {
        self.inspect_cache(unit, |cache| cache.is_dirty(kind))
    }

    /// Mark every cache of every node dirty, e.g. after reloading authoritative state.
    pub fn reset_caches(&self) {
        let slots: Vec<Slot> = self.nodes.read().values().cloned().collect();
        for slot in slots {
            slot.lock().cache.invalidate_all();
        }
        tracing::debug!("reset every inventory cache");
    }

    pub(crate) fn slot(&self, unit: UnitId) -> InventoryResult<Slot> {
        self.nodes
            .read()
            .get(&unit)
            .cloned()
            .ok_or(InventoryError::UnknownUnit(unit))
    }

    pub(crate) fn with_node<R>(
        &self,
        unit: UnitId,
        f: impl FnOnce(&mut InventoryNode) -> R,
    ) -> InventoryResult<R> {
        let slot = self.slot(unit)?;
        let mut node = slot.lock();
        Ok(f(&mut node))
    }

    fn inspect_cache<R>(&self, unit: UnitId, f: impl FnOnce(&CacheLayer) -> R) -> InventoryResult<R> {
        self.inspect(unit, |node| f(&node.cache))
    }

    pub(crate) fn phase_of(&self, resource: ResourceId) -> InventoryResult<PhaseType> {
        self.catalog
            .phase_of(resource)
            .ok_or(InventoryError::UnknownResource(ResourceKey::Amount(resource)))
    }

    pub(crate) fn tolerance(&self) -> f64 {
        self.config.slack_kg()
    }

    pub(crate) fn notify(&self, resource: ResourceKey, owner: UnitId, kind: ChangeKind, quantity: f64) {
        self.listener.on_resource_changed(&ResourceChange {
            resource,
            owner,
            kind,
            quantity,
        });
    }

    pub(crate) fn from_parts(
        nodes: HashMap<UnitId, InventoryNode>,
        catalog: Arc<ResourceCatalog>,
        config: InventoryConfig,
        listener: Arc<dyn ResourceChangeListener>,
    ) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|(id, node)| (id, Arc::new(Mutex::new(node))))
            .collect();
        Self {
            nodes: RwLock::new(nodes),
            catalog,
            config,
            listener,
        }
    }

    pub(crate) fn all_nodes(&self) -> Vec<InventoryNode> {
        let slots: Vec<Slot> = self.nodes.read().values().cloned().collect();
        slots.iter().map(|slot| slot.lock().clone()).collect()
    }
}

impl UnitDirectory for Inventories {
    fn contains(&self, unit: UnitId) -> bool {
        self.nodes.read().contains_key(&unit)
    }

    fn container_of(&self, unit: UnitId) -> Option<UnitId> {
        self.container(unit).ok().flatten()
    }

    fn len(&self) -> usize {
        self.nodes.read().len()
    }
}

impl std::fmt::Debug for Inventories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventories")
            .field("units", &self.nodes.read().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
