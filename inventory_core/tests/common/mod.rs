#![allow(dead_code)]

use colony_rules::{ItemResourceId, ResourceCatalog, ResourceId, UnitId, UnitKind, UnitProfile};
use inventory_core::{Inventories, InventoryConfig};
use std::sync::Arc;

pub const OXYGEN: ResourceId = ResourceId(1);
pub const WATER: ResourceId = ResourceId(2);
pub const METHANE: ResourceId = ResourceId(3);
pub const REGOLITH: ResourceId = ResourceId(4);

pub const SPARE_PART: ItemResourceId = ItemResourceId(100);
pub const PIPE_WRENCH: ItemResourceId = ItemResourceId(101);

pub const EPSILON: f64 = 1e-6;

const CATALOG: &str = r#"
    [[amount]]
    id = 1
    name = "oxygen"
    phase = "gas"

    [[amount]]
    id = 2
    name = "water"
    phase = "liquid"

    [[amount]]
    id = 3
    name = "methane"
    phase = "gas"

    [[amount]]
    id = 4
    name = "regolith"
    phase = "solid"

    [[item]]
    id = 100
    name = "spare part"
    mass_per_item_kg = 2.0

    [[item]]
    id = 101
    name = "pipe wrench"
    mass_per_item_kg = 1.5
"#;

pub fn catalog() -> Arc<ResourceCatalog> {
    Arc::new(ResourceCatalog::from_toml_str(CATALOG).unwrap())
}

pub fn inventories() -> Inventories {
    Inventories::new(catalog(), InventoryConfig::default())
}

pub fn strict_inventories() -> Inventories {
    Inventories::new(catalog(), InventoryConfig::strict())
}

/// Settlement with 1000 kg of general capacity and its own oxygen tank.
pub fn settlement(inv: &Inventories, oxygen_kg: f64) -> UnitId {
    inv.register(
        &UnitProfile::new("Settlement", UnitKind::Settlement)
            .with_general_capacity(1000.0)
            .with_type_capacity(OXYGEN, oxygen_kg),
    )
    .unwrap()
}

/// Empty, uncommitted bag.
pub fn bag(inv: &Inventories, capacity_kg: f64) -> UnitId {
    inv.register(
        &UnitProfile::new("Bag", UnitKind::Equipment)
            .with_base_mass(0.5)
            .as_container(capacity_kg),
    )
    .unwrap()
}

/// Empty, uncommitted crate that can also hold bags.
pub fn storage_crate(inv: &Inventories, capacity_kg: f64, general_kg: f64) -> UnitId {
    inv.register(
        &UnitProfile::new("Crate", UnitKind::Equipment)
            .with_base_mass(1.0)
            .with_general_capacity(general_kg)
            .as_container(capacity_kg),
    )
    .unwrap()
}

pub fn vehicle(inv: &Inventories, general_kg: f64, base_mass_kg: f64) -> UnitId {
    inv.register(
        &UnitProfile::new("Rover", UnitKind::Vehicle)
            .with_general_capacity(general_kg)
            .with_base_mass(base_mass_kg),
    )
    .unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
