//! Resource catalog - static properties of every amount and item resource.
//!
//! The catalog is read-mostly: it is built once at start-up (in code or from a
//! TOML document) and then shared by every inventory.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::mechanics::{ItemResourceId, PhaseType, ResourceId};

/// A continuous resource tracked in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountResource {
    pub id: ResourceId,
    pub name: String,
    pub phase: PhaseType,
}

/// A discrete resource tracked as a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResource {
    pub id: ItemResourceId,
    pub name: String,
    pub mass_per_item_kg: f64,
}

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("amount resource {0} is already registered")]
    DuplicateAmount(ResourceId),

    #[error("item resource {0} is already registered")]
    DuplicateItem(ItemResourceId),

    #[error("item resource {id} has invalid mass per item {mass}")]
    InvalidItemMass { id: ItemResourceId, mass: f64 },

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Toml(#[from] toml::de::Error),
}

/// On-disk layout of a catalog document.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    amount: Vec<AmountResource>,
    #[serde(default)]
    item: Vec<ItemResource>,
}

/// Registry of resource definitions keyed by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    amounts: HashMap<ResourceId, AmountResource>,
    items: HashMap<ItemResourceId, ItemResource>,
}

impl ResourceCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a TOML document with `[[amount]]` and `[[item]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::new();
        for resource in file.amount {
            catalog.register_amount(resource)?;
        }
        for item in file.item {
            catalog.register_item(item)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Register an amount resource.
    pub fn register_amount(&mut self, resource: AmountResource) -> Result<ResourceId, CatalogError> {
        let id = resource.id;
        if self.amounts.contains_key(&id) {
            return Err(CatalogError::DuplicateAmount(id));
        }
        self.amounts.insert(id, resource);
        Ok(id)
    }

    /// Register an item resource.
    pub fn register_item(&mut self, item: ItemResource) -> Result<ItemResourceId, CatalogError> {
        let id = item.id;
        if !item.mass_per_item_kg.is_finite() || item.mass_per_item_kg < 0.0 {
            return Err(CatalogError::InvalidItemMass {
                id,
                mass: item.mass_per_item_kg,
            });
        }
        if self.items.contains_key(&id) {
            return Err(CatalogError::DuplicateItem(id));
        }
        self.items.insert(id, item);
        Ok(id)
    }

    /// Builder-style registration of an amount resource.
    pub fn with_amount(
        mut self,
        id: u32,
        name: impl Into<String>,
        phase: PhaseType,
    ) -> Result<Self, CatalogError> {
        self.register_amount(AmountResource {
            id: ResourceId(id),
            name: name.into(),
            phase,
        })?;
        Ok(self)
    }

    /// Builder-style registration of an item resource.
    pub fn with_item(
        mut self,
        id: u32,
        name: impl Into<String>,
        mass_per_item_kg: f64,
    ) -> Result<Self, CatalogError> {
        self.register_item(ItemResource {
            id: ItemResourceId(id),
            name: name.into(),
            mass_per_item_kg,
        })?;
        Ok(self)
    }

    /// Get an amount resource by ID.
    pub fn amount(&self, id: ResourceId) -> Option<&AmountResource> {
        self.amounts.get(&id)
    }

    /// Get an item resource by ID.
    pub fn item(&self, id: ItemResourceId) -> Option<&ItemResource> {
        self.items.get(&id)
    }

    /// Phase of an amount resource.
    pub fn phase_of(&self, id: ResourceId) -> Option<PhaseType> {
        self.amounts.get(&id).map(|r| r.phase)
    }

    /// Mass of a single unit of an item resource, in kg.
    pub fn mass_per_item(&self, id: ItemResourceId) -> Option<f64> {
        self.items.get(&id).map(|i| i.mass_per_item_kg)
    }

    /// Every registered amount resource ID, ordered.
    pub fn all_resource_ids(&self) -> BTreeSet<ResourceId> {
        self.amounts.keys().copied().collect()
    }

    /// Amount resources of one phase, ordered.
    pub fn resources_in_phase(&self, phase: PhaseType) -> BTreeSet<ResourceId> {
        self.amounts
            .values()
            .filter(|r| r.phase == phase)
            .map(|r| r.id)
            .collect()
    }

    /// Every registered item resource ID, ordered.
    pub fn all_item_ids(&self) -> BTreeSet<ItemResourceId> {
        self.items.keys().copied().collect()
    }

    /// Find an amount resource by name (case-insensitive).
    pub fn find_amount(&self, name: &str) -> Option<&AmountResource> {
        self.amounts
            .values()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Find an item resource by name (case-insensitive).
    pub fn find_item(&self, name: &str) -> Option<&ItemResource> {
        self.items.values().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Number of registered amount resources.
    pub fn amount_count(&self) -> usize {
        self.amounts.len()
    }

    /// Number of registered item resources.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
