//! Upward invalidation.
//!
//! A mutation dirties a set of entries on the node it touched, then walks the
//! container chain: at each level the set is lifted to the container entries
//! that depend on it and those are dirtied in turn. One node is locked at a
//! time and the walk stops after as many steps as there are nodes.

use colony_rules::{ResourceId, UnitId};

use super::Inventories;
use crate::cache::CacheKind;
use crate::node::Commitment;

/// Entries made stale on a node whose own stock of `resource` changed.
///
/// `phase_peers` are the resources sharing a phase pool with `resource`;
/// their capacity moves with it.
pub(crate) fn amount_changed(
    resource: ResourceId,
    phase_peers: impl IntoIterator<Item = ResourceId>,
    commitment: Commitment,
) -> Vec<CacheKind> {
    let mut kinds = vec![
        CacheKind::Stored(resource),
        CacheKind::Capacity(resource),
        CacheKind::ResourcesPresent,
        CacheKind::ResourceMass,
        CacheKind::InventoryMass,
    ];
    kinds.extend(
        phase_peers
            .into_iter()
            .filter(|peer| *peer != resource)
            .map(CacheKind::Capacity),
    );
    // a container switching resource changes its capacity for every other one
    if commitment != Commitment::Unchanged {
        kinds.push(CacheKind::CapacityAll);
        kinds.push(CacheKind::StoredAll);
    }
    kinds
}

/// Entries made stale on a container that was committed or released. Its
/// container's view of what it accepts changes with it.
pub(crate) fn commitment_changed() -> Vec<CacheKind> {
    vec![
        CacheKind::CapacityAll,
        CacheKind::StoredAll,
        CacheKind::ResourcesPresent,
    ]
}

/// Entries made stale on a node whose item ledger changed.
pub(crate) fn items_changed() -> Vec<CacheKind> {
    vec![CacheKind::InventoryMass, CacheKind::CapacityAll]
}

/// Entries made stale on a node that gained or lost a contained unit.
pub(crate) fn contents_changed(child_is_container: bool) -> Vec<CacheKind> {
    let mut kinds = vec![
        CacheKind::UnitMass,
        CacheKind::InventoryMass,
        CacheKind::CapacityAll,
    ];
    if child_is_container {
        kinds.push(CacheKind::StoredAll);
        kinds.push(CacheKind::ResourcesPresent);
    }
    kinds
}

impl Inventories {
    /// Dirty `kinds` on `origin`, then the lifted kinds on every container above it.
    pub(crate) fn mark_dirty(&self, origin: UnitId, kinds: &[CacheKind]) {
        let limit = self.nodes.read().len();
        let mut kinds = kinds.to_vec();
        let mut current = Some(origin);
        let mut depth = 0usize;

        while let Some(unit) = current {
            let Ok(slot) = self.slot(unit) else {
                tracing::error!(unit = %unit, origin = %origin, "container vanished during invalidation");
                break;
            };
            current = {
                let mut node = slot.lock();
                for kind in &kinds {
                    node.cache.invalidate(*kind);
                }
                node.container()
            };

            depth += 1;
            if depth > limit {
                tracing::error!(origin = %origin, depth, "container chain does not terminate");
                break;
            }
            kinds = CacheKind::lift_all(&kinds);
        }
        tracing::trace!(origin = %origin, depth, "invalidated caches");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_dirties_every_capacity() {
        let oxygen = ResourceId(1);
        let methane = ResourceId(3);
        let plain = amount_changed(oxygen, [oxygen, methane], Commitment::Unchanged);
        let switched = amount_changed(oxygen, std::iter::empty(), Commitment::Committed);

        assert!(!plain.contains(&CacheKind::CapacityAll));
        assert!(plain.contains(&CacheKind::Capacity(methane)));
        assert!(switched.contains(&CacheKind::CapacityAll));
        assert!(switched.contains(&CacheKind::Stored(oxygen)));
    }

    #[test]
    fn test_commitment_change_reaches_the_container_above() {
        let lifted = CacheKind::lift_all(&commitment_changed());
        assert!(lifted.contains(&CacheKind::StoredAll));
        assert!(lifted.contains(&CacheKind::CapacityAll));
        assert!(lifted.contains(&CacheKind::ResourcesPresent));
    }

    #[test]
    fn test_container_child_dirties_stored() {
        assert!(!contents_changed(false).contains(&CacheKind::StoredAll));
        assert!(contents_changed(true).contains(&CacheKind::StoredAll));
        assert!(contents_changed(true).contains(&CacheKind::ResourcesPresent));
    }
}
