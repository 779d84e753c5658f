//! Error types for inventory operations.

use colony_rules::{ResourceId, ResourceKey, UnitId};

/// Error returned by a store, retrieve, containment or query operation.
///
/// Every variant is returned before the operation mutates anything. Shortfalls
/// that were partly satisfied under a lenient policy come back as
/// [`StoreOutcome`](crate::StoreOutcome) / [`RetrieveOutcome`](crate::RetrieveOutcome)
/// values instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InventoryError {
    /// Negative, NaN or infinite quantity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("capacity exceeded for {resource}: requested {requested} kg, room for {available} kg")]
    CapacityExceeded {
        resource: ResourceId,
        requested: f64,
        available: f64,
    },

    #[error("mass exceeded: {required} kg does not fit in the remaining {available} kg")]
    MassExceeded { required: f64, available: f64 },

    #[error("insufficient stock of {resource}: requested {requested}, only {available} present")]
    InsufficientStock {
        resource: ResourceKey,
        requested: f64,
        available: f64,
    },

    #[error("containing {child} in {parent} would make a unit its own container")]
    CycleDetected { parent: UnitId, child: UnitId },

    #[error("{child} holds {resource}, which {parent} cannot take")]
    IncompatibleContents {
        parent: UnitId,
        child: UnitId,
        resource: ResourceId,
    },

    #[error("{child} is not contained in {parent}")]
    NotContained { parent: UnitId, child: UnitId },

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unknown resource {0}")]
    UnknownResource(ResourceKey),

    #[error("unit {0} already has an inventory")]
    DuplicateUnit(UnitId),

    #[error("inconsistent containment: {0}")]
    InconsistentContainment(String),
}

/// Convenience alias used throughout the crate.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Reject quantities the engine cannot reason about.
pub(crate) fn check_amount(amount: f64) -> InventoryResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(InventoryError::InvalidArgument(format!(
            "amount must be a finite, non-negative number of kg, got {amount}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount() {
        assert!(check_amount(0.0).is_ok());
        assert!(check_amount(12.5).is_ok());
        assert!(matches!(check_amount(-0.1), Err(InventoryError::InvalidArgument(_))));
        assert!(matches!(check_amount(f64::NAN), Err(InventoryError::InvalidArgument(_))));
        assert!(matches!(check_amount(f64::INFINITY), Err(InventoryError::InvalidArgument(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = InventoryError::InsufficientStock {
            resource: ResourceKey::Amount(ResourceId(1)),
            requested: 10.0,
            available: 4.0,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock of amount#1: requested 10, only 4 present"
        );
    }
}
