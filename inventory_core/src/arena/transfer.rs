//! Store and retrieve, for amount and item resources.

use colony_rules::{ItemResourceId, PhaseType, ResourceId, UnitId};

use super::invalidate::{amount_changed, items_changed};
use super::Inventories;
use crate::config::ShortfallPolicy;
use crate::error::{check_amount, InventoryError, InventoryResult};
use crate::events::ChangeKind;
use crate::node::Commitment;
use crate::outcome::{RetrieveOutcome, StoreOutcome};

impl Inventories {
    /// Store `amount` kg of `resource` in the unit.
    ///
    /// The unit's own pools fill first. With `use_contained_units` the rest
    /// spills into accepting containers inside it, in the order they were
    /// put there, recursively. A request larger than the available room is
    /// either rejected untouched or filled as far as it goes, depending on
    /// the configured store shortfall policy.
    pub fn store_amount_resource(
        &self,
        unit: UnitId,
        resource: ResourceId,
        amount: f64,
        use_contained_units: bool,
    ) -> InventoryResult<StoreOutcome<f64>> {
        check_amount(amount).map_err(|err| {
            tracing::warn!(unit = %unit, %resource, amount, "rejected quantity");
            err
        })?;
        let phase = self.phase_of(resource)?;
        self.slot(unit)?;
        if amount == 0.0 {
            return Ok(StoreOutcome::Complete);
        }

        let tolerance = self.tolerance();
        let available = self.remaining_capacity(unit, resource, use_contained_units, false)?;
        let target = if amount > available + tolerance {
            match self.config.store_shortfall {
                ShortfallPolicy::Strict => {
                    tracing::warn!(unit = %unit, %resource, amount, available, "store rejected, not enough room");
                    return Err(InventoryError::CapacityExceeded {
                        resource,
                        requested: amount,
                        available,
                    });
                }
                ShortfallPolicy::Lenient => {
                    tracing::warn!(unit = %unit, %resource, amount, available, "not enough room, storing what fits");
                    available
                }
            }
        } else {
            amount
        };

        let placed = self.fill(unit, resource, phase, target, use_contained_units)?;
        if placed > 0.0 {
            self.notify(resource.into(), unit, ChangeKind::Stored, placed);
        }

        let unplaced = amount - placed;
        if unplaced > tolerance {
            Ok(StoreOutcome::PartialFill(unplaced))
        } else {
            Ok(StoreOutcome::Complete)
        }
    }

    /// Retrieve `amount` kg of `resource` from the unit.
    ///
    /// The unit's own pools drain first, then containers inside it holding
    /// the resource. What happens when the unit holds less than requested
    /// depends on the configured retrieve shortfall policy.
    pub fn retrieve_amount_resource(
        &self,
        unit: UnitId,
        resource: ResourceId,
        amount: f64,
    ) -> InventoryResult<RetrieveOutcome<f64>> {
        check_amount(amount).map_err(|err| {
            tracing::warn!(unit = %unit, %resource, amount, "rejected quantity");
            err
        })?;
        let phase = self.phase_of(resource)?;
        self.slot(unit)?;
        if amount == 0.0 {
            return Ok(RetrieveOutcome::Complete);
        }

        let tolerance = self.tolerance();
        let available = self.stored_amount(unit, resource, false)?;
        let target = if amount > available + tolerance {
            match self.config.retrieve_shortfall {
                ShortfallPolicy::Strict => {
                    tracing::warn!(unit = %unit, %resource, amount, available, "retrieve rejected, not enough stock");
                    return Err(InventoryError::InsufficientStock {
                        resource: resource.into(),
                        requested: amount,
                        available,
                    });
                }
                ShortfallPolicy::Lenient => {
                    tracing::error!(unit = %unit, %resource, amount, available, "not enough stock, retrieving everything present");
                    available
                }
            }
        } else {
            amount
        };

        let drained = self.drain(unit, resource, phase, target)?;
        if drained > 0.0 {
            self.notify(resource.into(), unit, ChangeKind::Retrieved, drained);
        }

        let outstanding = amount - drained;
        if outstanding > tolerance {
            Ok(RetrieveOutcome::InsufficientStock(outstanding))
        } else {
            Ok(RetrieveOutcome::Complete)
        }
    }

    /// Store `count` items in the unit, limited by its remaining general capacity.
    pub fn store_item_resource(
        &self,
        unit: UnitId,
        item: ItemResourceId,
        count: u32,
    ) -> InventoryResult<StoreOutcome<u32>> {
        let mass_per_item = self
            .catalog
            .mass_per_item(item)
            .ok_or(InventoryError::UnknownResource(item.into()))?;
        if count == 0 {
            self.slot(unit)?;
            return Ok(StoreOutcome::Complete);
        }

        let room = self.item_room(unit)?;
        let fits = if mass_per_item > 0.0 {
            let whole = ((room + self.tolerance()) / mass_per_item).floor();
            if whole >= f64::from(count) {
                count
            } else {
                whole as u32
            }
        } else {
            count
        };

        if fits < count {
            let required = f64::from(count) * mass_per_item;
            match self.config.store_shortfall {
                ShortfallPolicy::Strict => {
                    tracing::warn!(unit = %unit, %item, count, room, "item store rejected, not enough room");
                    return Err(InventoryError::MassExceeded {
                        required,
                        available: room,
                    });
                }
                ShortfallPolicy::Lenient => {
                    tracing::warn!(unit = %unit, %item, count, fits, "not enough room, storing what fits");
                }
            }
        }

        if fits > 0 {
            self.with_node(unit, |node| node.items_mut().store(item, fits))??;
            self.mark_dirty(unit, &items_changed());
            self.notify(item.into(), unit, ChangeKind::Stored, f64::from(fits));
            tracing::debug!(unit = %unit, %item, count = fits, "stored items");
        }

        if fits < count {
            Ok(StoreOutcome::PartialFill(count - fits))
        } else {
            Ok(StoreOutcome::Complete)
        }
    }

    /// Retrieve `count` items from the unit's own ledger.
    pub fn retrieve_item_resource(
        &self,
        unit: UnitId,
        item: ItemResourceId,
        count: u32,
    ) -> InventoryResult<RetrieveOutcome<u32>> {
        if self.catalog.item(item).is_none() {
            return Err(InventoryError::UnknownResource(item.into()));
        }
        if count == 0 {
            self.slot(unit)?;
            return Ok(RetrieveOutcome::Complete);
        }

        let policy = self.config.retrieve_shortfall;
        let taken = self.with_node(unit, |node| -> InventoryResult<u32> {
            let held = node.items().count(item);
            if count > held {
                match policy {
                    ShortfallPolicy::Strict => {
                        tracing::warn!(unit = %unit, %item, count, held, "item retrieve rejected, not enough stock");
                        return Err(InventoryError::InsufficientStock {
                            resource: item.into(),
                            requested: f64::from(count),
                            available: f64::from(held),
                        });
                    }
                    ShortfallPolicy::Lenient => {
                        tracing::error!(unit = %unit, %item, count, held, "not enough items, retrieving everything present");
                    }
                }
            }
            let taken = count.min(held);
            if taken > 0 {
                node.items_mut().retrieve(item, taken)?;
            }
            Ok(taken)
        })??;

        if taken > 0 {
            self.mark_dirty(unit, &items_changed());
            self.notify(item.into(), unit, ChangeKind::Retrieved, f64::from(taken));
            tracing::debug!(unit = %unit, %item, count = taken, "retrieved items");
        }

        if taken < count {
            Ok(RetrieveOutcome::InsufficientStock(count - taken))
        } else {
            Ok(RetrieveOutcome::Complete)
        }
    }

    /// General capacity available to new items, bounded by the container's room too.
    fn item_room(&self, unit: UnitId) -> InventoryResult<f64> {
        let own = self.remaining_general_capacity(unit, false)?;
        match self.container(unit)? {
            Some(parent) => Ok(own.min(self.remaining_general_capacity(parent, false)?)),
            None => Ok(own),
        }
    }

    /// Place up to `quantity` in the unit, spilling into accepting containers.
    /// Returns how much was placed.
    fn fill(
        &self,
        unit: UnitId,
        resource: ResourceId,
        phase: PhaseType,
        quantity: f64,
        use_contained_units: bool,
    ) -> InventoryResult<f64> {
        let tolerance = self.tolerance();
        let (local, commitment, children) = self.with_node(unit, |node| -> InventoryResult<(f64, Commitment, Vec<UnitId>)> {
            let local = quantity.min(node.local_remaining(resource, phase)).max(0.0);
            let commitment = if local > 0.0 {
                node.deposit(resource, phase, local)?
            } else {
                Commitment::Unchanged
            };
            let children = if use_contained_units && quantity - local > tolerance {
                node.contents().as_slice().to_vec()
            } else {
                Vec::new()
            };
            Ok((local, commitment, children))
        })??;

        if local > 0.0 {
            let peers = self.catalog.resources_in_phase(phase);
            self.mark_dirty(unit, &amount_changed(resource, peers, commitment));
            if commitment == Commitment::Committed {
                self.commit_holders(unit, resource)?;
            }
            tracing::debug!(unit = %unit, %resource, kg = local, "stored locally");
        }

        let mut residual = quantity - local;
        for child in children {
            if residual <= tolerance {
                break;
            }
            if !self.inspect(child, |node| node.is_accepting_container(resource))? {
                continue;
            }
            let room = self.remaining_capacity(child, resource, true, false)?;
            let share = residual.min(room);
            if share <= tolerance {
                continue;
            }
            let placed = self.fill(child, resource, phase, share, true)?;
            tracing::debug!(unit = %unit, container = %child, %resource, kg = placed, "spilled into container");
            residual -= placed;
        }
        Ok(quantity - residual.max(0.0))
    }

    /// Take up to `quantity` from the unit, then from containers holding the
    /// resource. Returns how much was taken.
    fn drain(
        &self,
        unit: UnitId,
        resource: ResourceId,
        phase: PhaseType,
        quantity: f64,
    ) -> InventoryResult<f64> {
        let tolerance = self.tolerance();
        let (local, children) = self.with_node(unit, |node| -> InventoryResult<(f64, Vec<UnitId>)> {
            let local = quantity.min(node.amounts().stored(resource));
            if local > 0.0 {
                node.withdraw(resource, local)?;
            }
            let children = if quantity - local > tolerance {
                node.contents().as_slice().to_vec()
            } else {
                Vec::new()
            };
            Ok((local, children))
        })??;

        if local > 0.0 {
            let peers = self.catalog.resources_in_phase(phase);
            self.mark_dirty(unit, &amount_changed(resource, peers, Commitment::Unchanged));
            self.release_holders(unit, resource)?;
            tracing::debug!(unit = %unit, %resource, kg = local, "retrieved locally");
        }

        let mut residual = quantity - local;
        for child in children {
            if residual <= tolerance {
                break;
            }
            if !self.inspect(child, |node| node.is_accepting_container(resource))? {
                continue;
            }
            let taken = self.drain(child, resource, phase, residual)?;
            if taken > 0.0 {
                tracing::debug!(unit = %unit, container = %child, %resource, kg = taken, "drained container");
            }
            residual -= taken;
        }
        Ok(quantity - residual.max(0.0))
    }
}
