//! Unit directory - resolution of the containment relation by unit id.

use colony_rules::UnitId;

/// Read access to "which unit holds which".
pub trait UnitDirectory {
    /// Check if the unit is known.
    fn contains(&self, unit: UnitId) -> bool;

    /// The unit directly holding `unit`, if any.
    fn container_of(&self, unit: UnitId) -> Option<UnitId>;

    /// Upper bound on the depth of any containment chain.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walk the container chain of `unit`, nearest first.
///
/// The walk is bounded by the directory size so a corrupted chain cannot spin
/// forever.
pub fn ancestors<D: UnitDirectory + ?Sized>(directory: &D, unit: UnitId) -> Vec<UnitId> {
    let mut chain = Vec::new();
    let mut current = directory.container_of(unit);
    while let Some(id) = current {
        if chain.len() > directory.len() {
            tracing::error!(unit = %unit, "container chain does not terminate");
            break;
        }
        chain.push(id);
        current = directory.container_of(id);
    }
    chain
}

/// Check if `candidate` is `unit` itself or sits anywhere above it.
pub fn is_self_or_ancestor<D: UnitDirectory + ?Sized>(
    directory: &D,
    candidate: UnitId,
    unit: UnitId,
) -> bool {
    candidate == unit || ancestors(directory, unit).contains(&candidate)
}
