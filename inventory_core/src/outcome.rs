//! Outcomes of store and retrieve requests.
//!
//! A shortfall is not an error: whatever could be placed or drained has
//! already been committed and is not rolled back. The outcome carries the
//! unsatisfied remainder so the caller has to look at it.

use serde::{Deserialize, Serialize};

/// Result of a successful store request.
#[must_use = "a partial fill leaves part of the request unplaced"]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StoreOutcome<Q> {
    /// Everything was placed.
    Complete,
    /// This much could not be placed anywhere.
    PartialFill(Q),
}

/// Result of a successful retrieve request.
#[must_use = "an insufficient-stock outcome means less was handed out than asked for"]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RetrieveOutcome<Q> {
    /// The full request was drained.
    Complete,
    /// Stock ran out with this much still outstanding.
    InsufficientStock(Q),
}

impl<Q: Copy> StoreOutcome<Q> {
    /// Check if the whole request was placed.
    pub fn is_complete(&self) -> bool {
        matches!(self, StoreOutcome::Complete)
    }

    /// The unplaced remainder, if any.
    pub fn shortfall(&self) -> Option<Q> {
        match self {
            StoreOutcome::Complete => None,
            StoreOutcome::PartialFill(q) => Some(*q),
        }
    }
}

impl<Q: Copy> RetrieveOutcome<Q> {
    /// Check if the whole request was drained.
    pub fn is_complete(&self) -> bool {
        matches!(self, RetrieveOutcome::Complete)
    }

    /// The outstanding remainder, if any.
    pub fn shortfall(&self) -> Option<Q> {
        match self {
            RetrieveOutcome::Complete => None,
            RetrieveOutcome::InsufficientStock(q) => Some(*q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_outcome_helpers() {
        let done: StoreOutcome<f64> = StoreOutcome::Complete;
        assert!(done.is_complete());
        assert_eq!(done.shortfall(), None);

        let partial = StoreOutcome::PartialFill(25.0);
        assert!(!partial.is_complete());
        assert_eq!(partial.shortfall(), Some(25.0));
    }

    #[test]
    fn test_retrieve_outcome_helpers() {
        let short: RetrieveOutcome<u32> = RetrieveOutcome::InsufficientStock(3);
        assert!(!short.is_complete());
        assert_eq!(short.shortfall(), Some(3));
        assert!(RetrieveOutcome::<u32>::Complete.is_complete());
    }
}
