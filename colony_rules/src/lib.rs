//! # Colony Rules
//!
//! The static rules of the colony - unit identities and blueprints, matter phases,
//! and the resource catalog. This crate holds no mutable simulation state; the
//! inventory engine consumes it read-only.

pub mod catalog;
pub mod entities;
pub mod mechanics;

pub use catalog::*;
pub use entities::*;
pub use mechanics::*;
