//! Putting units inside other units, and taking them out again.

use colony_rules::UnitId;

use super::invalidate::contents_changed;
use super::Inventories;
use crate::directory::is_self_or_ancestor;
use crate::error::{InventoryError, InventoryResult};
use crate::node::InventoryNode;

impl Inventories {
    /// Put `child` inside `parent`.
    ///
    /// A unit already held elsewhere is moved. Containing a unit in its
    /// current container again does nothing. A loaded container can only go
    /// where every container holding it would take its resource, and commits
    /// them to it.
    pub fn contain_unit(&self, parent: UnitId, child: UnitId) -> InventoryResult<()> {
        self.slot(parent)?;
        let previous = self.container(child)?;

        if is_self_or_ancestor(self, child, parent) {
            tracing::warn!(parent = %parent, child = %child, "containment would create a cycle");
            return Err(InventoryError::CycleDetected { parent, child });
        }
        if previous == Some(parent) {
            return Ok(());
        }

        let required = self.total_mass(child, false)?;
        let available = self.remaining_general_capacity(parent, false)?;
        if required > available + self.tolerance() {
            tracing::warn!(parent = %parent, child = %child, required, available, "unit too heavy to contain");
            return Err(InventoryError::MassExceeded { required, available });
        }

        let (child_is_container, held) =
            self.inspect(child, |node| (node.is_container(), node.committed_resource()))?;
        if let Some(resource) = held {
            if !self.holders_accept(parent, resource)? {
                tracing::warn!(parent = %parent, child = %child, %resource, "container committed to another resource");
                return Err(InventoryError::IncompatibleContents {
                    parent,
                    child,
                    resource,
                });
            }
        }

        if let Some(old) = previous {
            self.with_node(old, |node| node.contents_mut().remove(child))?;
            self.mark_dirty(old, &contents_changed(child_is_container));
        }
        self.with_node(parent, |node| node.contents_mut().insert(child))?;
        self.with_node(child, |node| node.set_container(Some(parent)))?;
        self.mark_dirty(parent, &contents_changed(child_is_container));

        if let Some(resource) = held {
            self.commit_holders(parent, resource)?;
            if let Some(old) = previous {
                self.release_holders(old, resource)?;
            }
        }

        tracing::debug!(parent = %parent, child = %child, moved_from = ?previous, "contained unit");
        Ok(())
    }

    /// Take `child` out of `parent`, leaving it at the top of its own tree.
    pub fn uncontain_unit(&self, parent: UnitId, child: UnitId) -> InventoryResult<()> {
        self.slot(child)?;
        let removed = self.with_node(parent, |node| node.contents_mut().remove(child))?;
        if !removed {
            return Err(InventoryError::NotContained { parent, child });
        }

        let (child_is_container, held) = self.with_node(child, |node| {
            node.set_container(None);
            (node.is_container(), node.committed_resource())
        })?;
        self.mark_dirty(parent, &contents_changed(child_is_container));
        if let Some(resource) = held {
            self.release_holders(parent, resource)?;
        }

        tracing::debug!(parent = %parent, child = %child, "released unit");
        Ok(())
    }

    /// Check if `contain_unit(parent, child)` would succeed.
    pub fn can_contain_unit(&self, parent: UnitId, child: UnitId) -> InventoryResult<bool> {
        self.slot(parent)?;
        let previous = self.container(child)?;
        if is_self_or_ancestor(self, child, parent) {
            return Ok(false);
        }
        if previous == Some(parent) {
            return Ok(true);
        }
        let required = self.total_mass(child, false)?;
        let available = self.remaining_general_capacity(parent, false)?;
        if required > available + self.tolerance() {
            return Ok(false);
        }
        match self.inspect(child, InventoryNode::committed_resource)? {
            Some(resource) => self.holders_accept(parent, resource),
            None => Ok(true),
        }
    }

    /// Units directly inside `unit`, in the order they were put there.
    pub fn contained_units(&self, unit: UnitId) -> InventoryResult<Vec<UnitId>> {
        self.inspect(unit, |node| node.contents().as_slice().to_vec())
    }

    /// Unit directly holding `unit`.
    pub fn container(&self, unit: UnitId) -> InventoryResult<Option<UnitId>> {
        self.inspect(unit, InventoryNode::container)
    }
}
