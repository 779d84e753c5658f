//! Snapshots of the authoritative inventory state.
//!
//! A snapshot holds every node's pools, ledger and containment links. Caches
//! are not part of it; a restored arena starts with every entry dirty.

use colony_rules::{ResourceCatalog, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::arena::Inventories;
use crate::cache::CacheLayer;
use crate::config::InventoryConfig;
use crate::directory::{ancestors, UnitDirectory};
use crate::error::{InventoryError, InventoryResult};
use crate::events::ResourceChangeListener;
use crate::node::InventoryNode;

/// Serializable copy of every node in an arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub nodes: Vec<InventoryNode>,
}

impl InventorySnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Inventories {
    /// Copy out every node, ordered by unit id.
    pub fn snapshot(&self) -> InventorySnapshot {
        let mut nodes = self.all_nodes();
        nodes.sort_by_key(InventoryNode::owner);
        InventorySnapshot { nodes }
    }

    /// Rebuild an arena from a snapshot.
    ///
    /// Containment links are checked in both directions and for cycles
    /// before anything is built.
    pub fn restore(
        snapshot: InventorySnapshot,
        catalog: Arc<ResourceCatalog>,
        config: InventoryConfig,
        listener: Arc<dyn ResourceChangeListener>,
    ) -> InventoryResult<Self> {
        let mut nodes: HashMap<UnitId, InventoryNode> = HashMap::with_capacity(snapshot.nodes.len());
        for node in snapshot.nodes {
            let owner = node.owner();
            if nodes.insert(owner, node).is_some() {
                return Err(InventoryError::DuplicateUnit(owner));
            }
        }
        validate_links(&nodes)?;

        let resources = catalog.all_resource_ids();
        for node in nodes.values_mut() {
            node.cache = CacheLayer::primed(resources.iter().copied());
        }
        tracing::info!(units = nodes.len(), "restored inventories from snapshot");
        Ok(Self::from_parts(nodes, catalog, config, listener))
    }
}

struct Links<'a>(&'a HashMap<UnitId, InventoryNode>);

impl UnitDirectory for Links<'_> {
    fn contains(&self, unit: UnitId) -> bool {
        self.0.contains_key(&unit)
    }

    fn container_of(&self, unit: UnitId) -> Option<UnitId> {
        self.0.get(&unit).and_then(InventoryNode::container)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

fn validate_links(nodes: &HashMap<UnitId, InventoryNode>) -> InventoryResult<()> {
    for node in nodes.values() {
        let owner = node.owner();
        for child in node.contents().iter() {
            let held_by = nodes.get(&child).and_then(InventoryNode::container);
            if held_by != Some(owner) {
                return Err(InventoryError::InconsistentContainment(format!(
                    "{owner} lists {child} but {child} is held by {held_by:?}"
                )));
            }
        }
        if let Some(parent) = node.container() {
            let listed = nodes
                .get(&parent)
                .is_some_and(|p| p.contents().contains(owner));
            if !listed {
                return Err(InventoryError::InconsistentContainment(format!(
                    "{owner} claims to be inside {parent}, which does not list it"
                )));
            }
            if let Some(resource) = node.committed_resource() {
                let holder = nodes.get(&parent).filter(|p| p.is_container());
                if let Some(holder) = holder {
                    if holder.committed_resource() != Some(resource) {
                        return Err(InventoryError::InconsistentContainment(format!(
                            "{owner} holds {resource} inside {parent}, which is committed to {:?}",
                            holder.committed_resource()
                        )));
                    }
                }
            }
        }
    }

    let links = Links(nodes);
    for owner in nodes.keys() {
        if ancestors(&links, *owner).contains(owner) {
            return Err(InventoryError::InconsistentContainment(format!(
                "{owner} is inside itself"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullListener;
    use colony_rules::{PhaseType, ResourceId, UnitKind, UnitProfile};

    const OXYGEN: ResourceId = ResourceId(1);

    fn catalog() -> Arc<ResourceCatalog> {
        Arc::new(
            ResourceCatalog::new()
                .with_amount(1, "oxygen", PhaseType::Gas)
                .unwrap(),
        )
    }

    #[test]
    fn test_snapshot_roundtrip_through_json() {
        let inv = Inventories::new(catalog(), InventoryConfig::default());
        let base = inv
            .register(
                &UnitProfile::new("Base", UnitKind::Settlement)
                    .with_general_capacity(100.0)
                    .with_type_capacity(OXYGEN, 20.0),
            )
            .unwrap();
        let bag = inv
            .register(&UnitProfile::new("Bag", UnitKind::Equipment).as_container(10.0))
            .unwrap();
        inv.contain_unit(base, bag).unwrap();
        let _ = inv.store_amount_resource(base, OXYGEN, 25.0, true).unwrap();

        let json = inv.snapshot().to_json().unwrap();
        let restored = Inventories::restore(
            InventorySnapshot::from_json(&json).unwrap(),
            catalog(),
            InventoryConfig::default(),
            Arc::new(NullListener),
        )
        .unwrap();

        assert_eq!(restored.stored_amount(base, OXYGEN, false).unwrap(), 25.0);
        assert_eq!(restored.local_stored(bag, OXYGEN).unwrap(), 5.0);
        assert_eq!(restored.container(bag).unwrap(), Some(base));
    }

    #[test]
    fn test_one_sided_link_rejected() {
        let inv = Inventories::new(catalog(), InventoryConfig::default());
        let base = inv
            .register(&UnitProfile::new("Base", UnitKind::Settlement).with_general_capacity(10.0))
            .unwrap();
        let rover = inv.register(&UnitProfile::new("Rover", UnitKind::Vehicle)).unwrap();
        inv.contain_unit(base, rover).unwrap();

        let mut snapshot = inv.snapshot();
        for node in snapshot.nodes.iter_mut().filter(|n| n.owner() == rover) {
            node.set_container(None);
        }

        let result = Inventories::restore(
            snapshot,
            catalog(),
            InventoryConfig::default(),
            Arc::new(NullListener),
        );
        assert!(matches!(result, Err(InventoryError::InconsistentContainment(_))));
    }

    #[test]
    fn test_nested_commitment_mismatch_rejected() {
        let inv = Inventories::new(catalog(), InventoryConfig::default());
        let crate_ = inv
            .register(
                &UnitProfile::new("Crate", UnitKind::Equipment)
                    .with_general_capacity(20.0)
                    .as_container(10.0),
            )
            .unwrap();
        let bag = inv
            .register(&UnitProfile::new("Bag", UnitKind::Equipment).as_container(5.0))
            .unwrap();
        inv.contain_unit(crate_, bag).unwrap();
        let _ = inv.store_amount_resource(bag, OXYGEN, 2.0, false).unwrap();

        let mut snapshot = inv.snapshot();
        for node in snapshot.nodes.iter_mut().filter(|n| n.owner() == crate_) {
            node.release(OXYGEN);
        }

        let result = Inventories::restore(
            snapshot,
            catalog(),
            InventoryConfig::default(),
            Arc::new(NullListener),
        );
        assert!(matches!(result, Err(InventoryError::InconsistentContainment(_))));
    }
}
