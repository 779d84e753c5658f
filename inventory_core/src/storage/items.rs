//! Item resource ledger - counts of discrete resources held directly by a node.

use colony_rules::{ItemResourceId, ResourceCatalog, ResourceKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{InventoryError, InventoryResult};

/// Sparse map from item resource to count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemResourceLedger {
    counts: HashMap<ItemResourceId, u32>,
}

impl ItemResourceLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items of a kind held.
    pub fn count(&self, item: ItemResourceId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Add items.
    pub fn store(&mut self, item: ItemResourceId, count: u32) -> InventoryResult<()> {
        if count == 0 {
            return Ok(());
        }
        let held = self.counts.entry(item).or_insert(0);
        *held = held.checked_add(count).ok_or_else(|| {
            InventoryError::InvalidArgument(format!("{item} count overflows"))
        })?;
        Ok(())
    }

    /// Remove items.
    pub fn retrieve(&mut self, item: ItemResourceId, count: u32) -> InventoryResult<()> {
        let held = self.count(item);
        if count > held {
            return Err(InventoryError::InsufficientStock {
                resource: ResourceKey::Item(item),
                requested: f64::from(count),
                available: f64::from(held),
            });
        }
        if count == held {
            self.counts.remove(&item);
        } else if let Some(entry) = self.counts.get_mut(&item) {
            *entry -= count;
        }
        Ok(())
    }

    /// Combined mass of every item held, in kg. Unknown kinds weigh nothing.
    pub fn total_mass(&self, catalog: &ResourceCatalog) -> f64 {
        self.counts
            .iter()
            .map(|(id, count)| catalog.mass_per_item(*id).unwrap_or(0.0) * f64::from(*count))
            .sum()
    }

    /// Iterate over held kinds and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (ItemResourceId, u32)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    /// Check if no items are held.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
