//! Resource change notifications for economic tracking.
//!
//! The engine raises one [`ResourceChange`] per store or retrieve that moved
//! anything. Listeners aggregate on their own; the engine never queries them.

use colony_rules::{ResourceKey, UnitId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Direction of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Stored,
    Retrieved,
}

/// A committed store or retrieve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub resource: ResourceKey,
    /// Unit whose inventory the caller addressed.
    pub owner: UnitId,
    pub kind: ChangeKind,
    /// Kilograms for amount resources, item count for item resources.
    pub quantity: f64,
}

/// Receiver of fire-and-forget change notifications.
pub trait ResourceChangeListener: Send + Sync {
    /// Called after the change is committed and caches are invalidated.
    fn on_resource_changed(&self, change: &ResourceChange);
}

/// Listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullListener;

impl ResourceChangeListener for NullListener {
    fn on_resource_changed(&self, _change: &ResourceChange) {}
}

/// Thread-safe listener that records every notification in order.
#[derive(Debug, Default)]
pub struct ChangeLog {
    events: Mutex<Vec<ResourceChange>>,
}

impl ChangeLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded change.
    pub fn events(&self) -> Vec<ResourceChange> {
        self.events.lock().clone()
    }

    /// Take every recorded change, leaving the log empty.
    pub fn drain(&self) -> Vec<ResourceChange> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of changes recorded for a resource.
    pub fn count_for(&self, resource: impl Into<ResourceKey>) -> usize {
        let resource = resource.into();
        self.events
            .lock()
            .iter()
            .filter(|e| e.resource == resource)
            .count()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl ResourceChangeListener for ChangeLog {
    fn on_resource_changed(&self, change: &ResourceChange) {
        self.events.lock().push(change.clone());
    }
}
