//! Authoritative storage data of a node.
//!
//! - **amounts**: local amount-resource pools and stored quantities
//! - **items**: item resource counts
//! - **containment**: the units held inside the node
//!
//! This is everything that needs to survive a save; caches are rebuilt from it.

mod amounts;
mod containment;
mod items;

pub use amounts::*;
pub use containment::*;
pub use items::*;
