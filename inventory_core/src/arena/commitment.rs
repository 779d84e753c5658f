//! Container commitments across nesting.
//!
//! A container's stored total includes the stock of every container nested
//! directly in it, so its commitment covers that stock too. Committing a
//! container commits each container directly above it, and a container is
//! released only once nothing at or below it holds the resource any more.

use colony_rules::{ResourceId, UnitId};

use super::invalidate::commitment_changed;
use super::Inventories;
use crate::error::InventoryResult;
use crate::node::Commitment;

impl Inventories {
    /// Containers whose stored totals include `unit`'s own stock: the unit
    /// itself if it is a container, then each container above it for as long
    /// as the chain is made of containers. Innermost first.
    pub(crate) fn holding_containers(&self, unit: UnitId) -> InventoryResult<Vec<UnitId>> {
        let limit = self.nodes.read().len();
        let mut chain = Vec::new();
        let mut current = Some(unit);
        while let Some(id) = current {
            let (is_container, parent) = self.inspect(id, |node| (node.is_container(), node.container()))?;
            if !is_container {
                break;
            }
            if chain.len() >= limit {
                tracing::error!(unit = %unit, "container chain does not terminate");
                break;
            }
            chain.push(id);
            current = parent;
        }
        Ok(chain)
    }

    /// Check if every container holding `unit`'s stock would take `resource`.
    pub(crate) fn holders_accept(&self, unit: UnitId, resource: ResourceId) -> InventoryResult<bool> {
        for id in self.holding_containers(unit)? {
            if !self.inspect(id, |node| node.is_accepting_container(resource))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Commit every uncommitted container holding `unit`'s stock to `resource`.
    pub(crate) fn commit_holders(&self, unit: UnitId, resource: ResourceId) -> InventoryResult<()> {
        for id in self.holding_containers(unit)? {
            if self.with_node(id, |node| node.commit(resource))? == Commitment::Committed {
                self.mark_dirty(id, &commitment_changed());
                tracing::debug!(unit = %id, %resource, "committed container");
            }
        }
        Ok(())
    }

    /// Release, innermost first, the containers holding `unit`'s stock that
    /// no longer hold any `resource`. Stops at the first one that still does.
    pub(crate) fn release_holders(&self, unit: UnitId, resource: ResourceId) -> InventoryResult<()> {
        for id in self.holding_containers(unit)? {
            if self.stored_amount(id, resource, false)? > 0.0 {
                break;
            }
            if self.with_node(id, |node| node.release(resource))? == Commitment::Released {
                self.mark_dirty(id, &commitment_changed());
                tracing::debug!(unit = %id, %resource, "released container");
            }
        }
        Ok(())
    }
}
