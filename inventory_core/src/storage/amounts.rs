//! Local amount-resource storage - a node's own pools, not counting anything nested.

use colony_rules::{PhaseType, ResourceId, ResourceKey, StorageComponent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{check_amount, InventoryError, InventoryResult};

/// Slack absorbed by capacity and stock checks, in kg.
pub(crate) const SLACK_KG: f64 = 1e-9;

/// Quantity of one resource held locally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredAmount {
    pub phase: PhaseType,
    pub kg: f64,
}

/// Per-resource and per-phase capacity pools plus the amounts held in them.
///
/// A resource fills its type-specific capacity first; anything beyond that
/// draws on the pool of its phase, which every resource of that phase shares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalResourceStore {
    type_capacity: HashMap<ResourceId, f64>,
    phase_capacity: HashMap<PhaseType, f64>,
    stored: HashMap<ResourceId, StoredAmount>,
}

impl LocalResourceStore {
    /// Create a new store with no capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the pools declared by a storage component.
    pub fn from_component(storage: &StorageComponent) -> Self {
        Self {
            type_capacity: storage.type_capacity.clone(),
            phase_capacity: storage.phase_capacity.clone(),
            stored: HashMap::new(),
        }
    }

    /// Add capacity dedicated to one resource.
    pub fn add_type_capacity(&mut self, resource: ResourceId, kg: f64) {
        *self.type_capacity.entry(resource).or_insert(0.0) += kg;
    }

    /// Take back capacity dedicated to one resource, never going below zero.
    pub fn remove_type_capacity(&mut self, resource: ResourceId, kg: f64) {
        if let Some(capacity) = self.type_capacity.get_mut(&resource) {
            *capacity -= kg;
            if *capacity <= SLACK_KG {
                self.type_capacity.remove(&resource);
            }
        }
    }

    /// Add capacity shared by a phase.
    pub fn add_phase_capacity(&mut self, phase: PhaseType, kg: f64) {
        *self.phase_capacity.entry(phase).or_insert(0.0) += kg;
    }

    /// Capacity dedicated to a resource.
    pub fn type_capacity(&self, resource: ResourceId) -> f64 {
        self.type_capacity.get(&resource).copied().unwrap_or(0.0)
    }

    /// Capacity shared by a phase.
    pub fn phase_capacity(&self, phase: PhaseType) -> f64 {
        self.phase_capacity.get(&phase).copied().unwrap_or(0.0)
    }

    /// Total capacity available to a resource: type-specific plus phase pool.
    pub fn capacity(&self, resource: ResourceId, phase: PhaseType) -> f64 {
        self.type_capacity(resource) + self.phase_capacity(phase)
    }

    /// Amount of a resource held locally.
    pub fn stored(&self, resource: ResourceId) -> f64 {
        self.stored.get(&resource).map(|s| s.kg).unwrap_or(0.0)
    }

    /// How much of a phase pool is occupied by overflow from type capacities.
    pub fn phase_used(&self, phase: PhaseType) -> f64 {
        self.stored
            .iter()
            .filter(|(_, s)| s.phase == phase)
            .map(|(id, s)| (s.kg - self.type_capacity(*id)).max(0.0))
            .sum()
    }

    /// Room left for a resource.
    pub fn remaining(&self, resource: ResourceId, phase: PhaseType) -> f64 {
        let type_free = (self.type_capacity(resource) - self.stored(resource)).max(0.0);
        let phase_free = (self.phase_capacity(phase) - self.phase_used(phase)).max(0.0);
        type_free + phase_free
    }

    /// Put an amount into local storage.
    pub fn store(&mut self, resource: ResourceId, phase: PhaseType, amount: f64) -> InventoryResult<()> {
        check_amount(amount)?;
        let available = self.remaining(resource, phase);
        if amount > available + SLACK_KG {
            return Err(InventoryError::CapacityExceeded {
                resource,
                requested: amount,
                available,
            });
        }
        if amount > 0.0 {
            self.stored
                .entry(resource)
                .or_insert(StoredAmount { phase, kg: 0.0 })
                .kg += amount;
        }
        Ok(())
    }

    /// Take an amount out of local storage.
    pub fn retrieve(&mut self, resource: ResourceId, amount: f64) -> InventoryResult<()> {
        check_amount(amount)?;
        let available = self.stored(resource);
        if amount > available + SLACK_KG {
            return Err(InventoryError::InsufficientStock {
                resource: ResourceKey::Amount(resource),
                requested: amount,
                available,
            });
        }
        if let Some(entry) = self.stored.get_mut(&resource) {
            entry.kg -= amount;
            if entry.kg <= SLACK_KG {
                self.stored.remove(&resource);
            }
        }
        Ok(())
    }

    /// Sum of every locally held amount.
    pub fn total_stored(&self) -> f64 {
        self.stored.values().map(|s| s.kg).sum()
    }

    /// Resources held locally with a positive amount.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceId, f64)> + '_ {
        self.stored
            .iter()
            .filter(|(_, s)| s.kg > 0.0)
            .map(|(id, s)| (*id, s.kg))
    }

    /// Check if nothing is held locally.
    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OXYGEN: ResourceId = ResourceId(1);
    const HYDROGEN: ResourceId = ResourceId(2);
    const WATER: ResourceId = ResourceId(3);

    #[test]
    fn test_store_within_type_capacity() {
        let mut store = LocalResourceStore::new();
        store.add_type_capacity(OXYGEN, 50.0);

        store.store(OXYGEN, PhaseType::Gas, 30.0).unwrap();

        assert_eq!(store.stored(OXYGEN), 30.0);
        assert_eq!(store.remaining(OXYGEN, PhaseType::Gas), 20.0);
        assert_eq!(store.capacity(OXYGEN, PhaseType::Gas), 50.0);
    }

    #[test]
    fn test_store_over_capacity_rejected() {
        let mut store = LocalResourceStore::new();
        store.add_type_capacity(OXYGEN, 10.0);

        let result = store.store(OXYGEN, PhaseType::Gas, 10.5);
        assert!(matches!(result, Err(InventoryError::CapacityExceeded { .. })));
        assert_eq!(store.stored(OXYGEN), 0.0);
    }

    #[test]
    fn test_phase_pool_is_shared() {
        let mut store = LocalResourceStore::new();
        store.add_phase_capacity(PhaseType::Gas, 100.0);
        store.add_type_capacity(OXYGEN, 20.0);

        // 20 kg goes into the oxygen pool, 40 kg spills into the gas pool.
        store.store(OXYGEN, PhaseType::Gas, 60.0).unwrap();
        assert_eq!(store.phase_used(PhaseType::Gas), 40.0);
        assert_eq!(store.remaining(HYDROGEN, PhaseType::Gas), 60.0);

        store.store(HYDROGEN, PhaseType::Gas, 60.0).unwrap();
        assert_eq!(store.remaining(HYDROGEN, PhaseType::Gas), 0.0);
        assert_eq!(store.remaining(OXYGEN, PhaseType::Gas), 0.0);

        // A liquid resource is untouched by the gas pool.
        assert_eq!(store.remaining(WATER, PhaseType::Liquid), 0.0);
    }

    #[test]
    fn test_retrieve() {
        let mut store = LocalResourceStore::new();
        store.add_type_capacity(WATER, 40.0);
        store.store(WATER, PhaseType::Liquid, 25.0).unwrap();

        store.retrieve(WATER, 5.0).unwrap();
        assert_eq!(store.stored(WATER), 20.0);

        let result = store.retrieve(WATER, 21.0);
        assert!(matches!(result, Err(InventoryError::InsufficientStock { .. })));
        assert_eq!(store.stored(WATER), 20.0);

        store.retrieve(WATER, 20.0).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut store = LocalResourceStore::new();
        store.add_type_capacity(OXYGEN, 10.0);
        assert!(matches!(
            store.store(OXYGEN, PhaseType::Gas, -1.0),
            Err(InventoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.retrieve(OXYGEN, -1.0),
            Err(InventoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_remove_type_capacity_clamps() {
        let mut store = LocalResourceStore::new();
        store.add_type_capacity(OXYGEN, 10.0);
        store.remove_type_capacity(OXYGEN, 15.0);
        assert_eq!(store.type_capacity(OXYGEN), 0.0);
    }

    #[test]
    fn test_total_stored() {
        let mut store = LocalResourceStore::new();
        store.add_phase_capacity(PhaseType::Gas, 100.0);
        store.store(OXYGEN, PhaseType::Gas, 12.0).unwrap();
        store.store(HYDROGEN, PhaseType::Gas, 3.0).unwrap();

        assert_eq!(store.total_stored(), 15.0);
        assert_eq!(store.resources().count(), 2);
    }
}
