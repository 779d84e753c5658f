//! Single dirty-flagged cache slot.

use colony_rules::ResourceId;
use std::collections::HashMap;

/// A cached value and whether it may be stale.
///
/// `dirty == false` means `value` equals a full recomputation right now.
/// New entries start dirty and empty.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: Option<T>,
    dirty: bool,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            value: None,
            dirty: true,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    /// The cached value, if it can be trusted.
    ///
    /// With `allow_dirty` a stale value is returned as well, but an entry that
    /// was never computed still yields `None`.
    pub fn get(&self, allow_dirty: bool) -> Option<T> {
        if self.dirty && !allow_dirty {
            return None;
        }
        self.value.clone()
    }

    /// Store a freshly computed value and clear the dirty flag.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.dirty = false;
    }

    /// Recompute through `compute` if dirty, then return the current value.
    pub fn refresh_if_dirty(&mut self, compute: impl FnOnce() -> T) -> T {
        match &self.value {
            Some(value) if !self.dirty => value.clone(),
            _ => {
                let value = compute();
                self.set(value.clone());
                value
            }
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// One cache entry per amount resource, created lazily.
#[derive(Debug, Clone, Default)]
pub struct PerResourceCache {
    entries: HashMap<ResourceId, CacheEntry<f64>>,
}

impl PerResourceCache {
    /// Pre-create a dirty entry for every resource.
    pub fn primed(resources: impl IntoIterator<Item = ResourceId>) -> Self {
        Self {
            entries: resources
                .into_iter()
                .map(|id| (id, CacheEntry::default()))
                .collect(),
        }
    }

    pub fn get(&self, resource: ResourceId, allow_dirty: bool) -> Option<f64> {
        self.entries.get(&resource)?.get(allow_dirty)
    }

    pub fn set(&mut self, resource: ResourceId, value: f64) {
        self.entries.entry(resource).or_default().set(value);
    }

    pub fn mark_dirty(&mut self, resource: ResourceId) {
        if let Some(entry) = self.entries.get_mut(&resource) {
            entry.mark_dirty();
        }
    }

    pub fn mark_all_dirty(&mut self) {
        for entry in self.entries.values_mut() {
            entry.mark_dirty();
        }
    }

    /// Entries never created count as dirty.
    pub fn is_dirty(&self, resource: ResourceId) -> bool {
        self.entries.get(&resource).map_or(true, CacheEntry::is_dirty)
    }

    /// Check if any entry of the family is dirty. An empty family is dirty.
    pub fn any_dirty(&self) -> bool {
        self.entries.is_empty() || self.entries.values().any(CacheEntry::is_dirty)
    }
}
