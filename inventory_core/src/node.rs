//! Inventory node - the storage owned by one unit.
//!
//! A node only knows about itself: its pools, its ledger, the ids of the units
//! inside it and the id of the unit holding it. Anything that needs to look at
//! another node goes through [`Inventories`](crate::Inventories).

use colony_rules::{PhaseType, ResourceId, UnitId, UnitProfile};
use serde::{Deserialize, Serialize};

use crate::cache::CacheLayer;
use crate::error::InventoryResult;
use crate::storage::{ContainmentSet, ItemResourceLedger, LocalResourceStore};

/// Ability to hold exactly one amount resource at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerCapability {
    pub capacity_kg: f64,
    /// `None` until the first store; reset once the container is emptied.
    pub resource: Option<ResourceId>,
}

impl ContainerCapability {
    pub fn new(capacity_kg: f64) -> Self {
        Self {
            capacity_kg,
            resource: None,
        }
    }

    /// Check if the container would take this resource.
    pub fn accepts(&self, resource: ResourceId) -> bool {
        self.resource.map_or(true, |committed| committed == resource)
    }
}

/// Change to a container's commitment caused by a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Unchanged,
    Committed,
    Released,
}

/// Authoritative inventory state of one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryNode {
    owner: UnitId,
    container: Option<UnitId>,
    base_mass_kg: f64,
    general_capacity_kg: f64,
    capability: Option<ContainerCapability>,
    amounts: LocalResourceStore,
    items: ItemResourceLedger,
    contents: ContainmentSet,
    #[serde(skip)]
    pub(crate) cache: CacheLayer,
}

impl InventoryNode {
    /// Create an empty, uncontained node from a unit blueprint.
    pub fn from_profile(profile: &UnitProfile) -> Self {
        Self {
            owner: profile.id,
            container: None,
            base_mass_kg: profile.base_mass_kg,
            general_capacity_kg: profile.storage.general_capacity_kg,
            capability: profile
                .storage
                .container
                .map(|spec| ContainerCapability::new(spec.capacity_kg)),
            amounts: LocalResourceStore::from_component(&profile.storage),
            items: ItemResourceLedger::new(),
            contents: ContainmentSet::new(),
            cache: CacheLayer::default(),
        }
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    /// Unit currently holding this one, `None` at the top of a tree.
    pub fn container(&self) -> Option<UnitId> {
        self.container
    }

    pub fn base_mass_kg(&self) -> f64 {
        self.base_mass_kg
    }

    pub fn general_capacity_kg(&self) -> f64 {
        self.general_capacity_kg
    }

    pub fn capability(&self) -> Option<&ContainerCapability> {
        self.capability.as_ref()
    }

    pub fn amounts(&self) -> &LocalResourceStore {
        &self.amounts
    }

    pub fn items(&self) -> &ItemResourceLedger {
        &self.items
    }

    pub fn contents(&self) -> &ContainmentSet {
        &self.contents
    }

    /// Check if this node has a container capability, committed or not.
    pub fn is_container(&self) -> bool {
        self.capability.is_some()
    }

    /// Resource the container is committed to.
    pub fn committed_resource(&self) -> Option<ResourceId> {
        self.capability.and_then(|c| c.resource)
    }

    /// Check if this node is a container that would take `resource`.
    pub fn is_accepting_container(&self, resource: ResourceId) -> bool {
        self.capability.is_some_and(|c| c.accepts(resource))
    }

    /// Capacity of the node's own pools for a resource: what it holds plus
    /// what it can still take, given what other resources of the same phase
    /// already draw from the shared phase pool.
    pub fn local_capacity(&self, resource: ResourceId, phase: PhaseType) -> f64 {
        self.amounts.stored(resource) + self.local_remaining(resource, phase)
    }

    /// Room left in the node's own pools for a resource.
    pub fn local_remaining(&self, resource: ResourceId, phase: PhaseType) -> f64 {
        match self.capability {
            None => self.amounts.remaining(resource, phase),
            Some(c) => match c.resource {
                None => self.amounts.remaining(resource, phase) + c.capacity_kg,
                Some(r) if r == resource => self.amounts.remaining(resource, phase),
                Some(_) => 0.0,
            },
        }
    }

    /// Put an amount into the node's own pools, committing a container on first use.
    pub(crate) fn deposit(
        &mut self,
        resource: ResourceId,
        phase: PhaseType,
        amount: f64,
    ) -> InventoryResult<Commitment> {
        let commitment = if amount > 0.0 {
            self.commit(resource)
        } else {
            Commitment::Unchanged
        };
        if let Err(err) = self.amounts.store(resource, phase, amount) {
            if commitment == Commitment::Committed {
                self.release(resource);
            }
            return Err(err);
        }
        Ok(commitment)
    }

    /// Take an amount out of the node's own pools.
    ///
    /// The container stays committed; whether it still holds the resource
    /// depends on what is nested inside it, which only the arena can see.
    pub(crate) fn withdraw(&mut self, resource: ResourceId, amount: f64) -> InventoryResult<()> {
        self.amounts.retrieve(resource, amount)
    }

    /// Commit an uncommitted container to `resource`.
    pub(crate) fn commit(&mut self, resource: ResourceId) -> Commitment {
        match self.capability.as_mut() {
            Some(capability) if capability.resource.is_none() => {
                capability.resource = Some(resource);
                self.amounts.add_type_capacity(resource, capability.capacity_kg);
                Commitment::Committed
            }
            _ => Commitment::Unchanged,
        }
    }

    /// Release a container committed to `resource`.
    pub(crate) fn release(&mut self, resource: ResourceId) -> Commitment {
        match self.capability.as_mut() {
            Some(capability) if capability.resource == Some(resource) => {
                capability.resource = None;
                self.amounts.remove_type_capacity(resource, capability.capacity_kg);
                Commitment::Released
            }
            _ => Commitment::Unchanged,
        }
    }

    /// Mass of locally stored amount resources, served from the cache when clean.
    pub(crate) fn cached_resource_mass(&mut self, allow_dirty: bool) -> f64 {
        if let Some(mass) = self.cache.resource_mass.get(allow_dirty) {
            return mass;
        }
        let amounts = &self.amounts;
        self.cache
            .resource_mass
            .refresh_if_dirty(|| amounts.total_stored())
    }

    pub(crate) fn items_mut(&mut self) -> &mut ItemResourceLedger {
        &mut self.items
    }

    pub(crate) fn contents_mut(&mut self) -> &mut ContainmentSet {
        &mut self.contents
    }

    pub(crate) fn set_container(&mut self, container: Option<UnitId>) {
        self.container = container;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_rules::UnitKind;

    const OXYGEN: ResourceId = ResourceId(1);
    const WATER: ResourceId = ResourceId(2);

    fn bag() -> InventoryNode {
        InventoryNode::from_profile(&UnitProfile::new("Bag", UnitKind::Equipment).as_container(10.0))
    }

    #[test]
    fn test_uncommitted_container_accepts_anything() {
        let node = bag();
        assert!(node.is_accepting_container(OXYGEN));
        assert!(node.is_accepting_container(WATER));
        assert_eq!(node.local_remaining(OXYGEN, PhaseType::Gas), 10.0);
        assert_eq!(node.local_capacity(WATER, PhaseType::Liquid), 10.0);
    }

    #[test]
    fn test_deposit_commits_container() {
        let mut node = bag();
        let commitment = node.deposit(OXYGEN, PhaseType::Gas, 4.0).unwrap();

        assert_eq!(commitment, Commitment::Committed);
        assert_eq!(node.capability().and_then(|c| c.resource), Some(OXYGEN));
        assert_eq!(node.local_remaining(OXYGEN, PhaseType::Gas), 6.0);
        assert_eq!(node.local_remaining(WATER, PhaseType::Liquid), 0.0);
        assert_eq!(node.local_capacity(WATER, PhaseType::Liquid), 0.0);
        assert!(!node.is_accepting_container(WATER));

        let again = node.deposit(OXYGEN, PhaseType::Gas, 1.0).unwrap();
        assert_eq!(again, Commitment::Unchanged);
    }

    #[test]
    fn test_release_after_emptying() {
        let mut node = bag();
        node.deposit(OXYGEN, PhaseType::Gas, 4.0).unwrap();
        node.withdraw(OXYGEN, 4.0).unwrap();
        assert_eq!(node.committed_resource(), Some(OXYGEN));

        assert_eq!(node.release(WATER), Commitment::Unchanged);
        assert_eq!(node.release(OXYGEN), Commitment::Released);
        assert_eq!(node.committed_resource(), None);
        assert_eq!(node.local_remaining(WATER, PhaseType::Liquid), 10.0);
        assert_eq!(node.amounts().type_capacity(OXYGEN), 0.0);
    }

    #[test]
    fn test_commit_without_stock() {
        let mut node = bag();
        assert_eq!(node.commit(WATER), Commitment::Committed);
        assert_eq!(node.commit(OXYGEN), Commitment::Unchanged);
        assert_eq!(node.local_remaining(OXYGEN, PhaseType::Gas), 0.0);
        assert_eq!(node.local_remaining(WATER, PhaseType::Liquid), 10.0);
    }

    #[test]
    fn test_failed_first_deposit_leaves_container_uncommitted() {
        let mut node = bag();
        assert!(node.deposit(OXYGEN, PhaseType::Gas, 12.0).is_err());
        assert_eq!(node.capability().and_then(|c| c.resource), None);
        assert_eq!(node.local_remaining(OXYGEN, PhaseType::Gas), 10.0);
    }

    #[test]
    fn test_plain_node_uses_its_pools() {
        let profile = UnitProfile::new("Base", UnitKind::Settlement)
            .with_type_capacity(OXYGEN, 50.0)
            .with_general_capacity(1000.0);
        let mut node = InventoryNode::from_profile(&profile);

        assert_eq!(node.deposit(OXYGEN, PhaseType::Gas, 30.0).unwrap(), Commitment::Unchanged);
        assert_eq!(node.local_remaining(OXYGEN, PhaseType::Gas), 20.0);
        assert!(!node.is_accepting_container(OXYGEN));
        assert_eq!(node.general_capacity_kg(), 1000.0);
    }
}
