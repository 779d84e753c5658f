//! Resource mechanics: matter phases and resource identifiers.

use serde::{Deserialize, Serialize};

/// Physical phase of an amount resource. Phase pools are shared per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseType {
    Solid,
    Liquid,
    Gas,
}

impl PhaseType {
    /// All phases in declaration order.
    pub const ALL: [PhaseType; 3] = [PhaseType::Solid, PhaseType::Liquid, PhaseType::Gas];

    /// Lowercase name used in catalog files.
    pub fn name(&self) -> &'static str {
        match self {
            PhaseType::Solid => "solid",
            PhaseType::Liquid => "liquid",
            PhaseType::Gas => "gas",
        }
    }
}

impl std::fmt::Display for PhaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a continuous, mass-measured resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "amount#{}", self.0)
    }
}

/// Identifier of a discrete, countable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemResourceId(pub u32);

impl std::fmt::Display for ItemResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Either kind of resource, for events and errors that cover both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    Amount(ResourceId),
    Item(ItemResourceId),
}

impl From<ResourceId> for ResourceKey {
    fn from(id: ResourceId) -> Self {
        ResourceKey::Amount(id)
    }
}

impl From<ItemResourceId> for ResourceKey {
    fn from(id: ItemResourceId) -> Self {
        ResourceKey::Item(id)
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKey::Amount(id) => id.fmt(f),
            ResourceKey::Item(id) => id.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_display() {
        assert_eq!(ResourceKey::from(ResourceId(4)).to_string(), "amount#4");
        assert_eq!(ResourceKey::from(ItemResourceId(9)).to_string(), "item#9");
    }

    #[test]
    fn test_phase_names() {
        let names: Vec<_> = PhaseType::ALL.iter().map(PhaseType::name).collect();
        assert_eq!(names, vec!["solid", "liquid", "gas"]);
    }
}
