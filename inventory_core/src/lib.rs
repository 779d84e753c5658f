//! # Inventory Core
//!
//! Resource inventories for every unit in the colony simulation: settlements,
//! vehicles, people, robots and the equipment they carry. Units can hold
//! other units, so inventories form trees, and most queries (how much oxygen
//! is in this settlement, how heavy is this rover) have to look through the
//! whole subtree below a unit. Those answers are cached per unit and
//! invalidated upward whenever something underneath changes.
//!
//! ## Core Components
//!
//! - **storage**: a unit's own amount pools, item ledger and list of held units
//! - **cache**: dirty-flagged capacity, stored and mass entries
//! - **node**: the authoritative state of one unit's inventory
//! - **arena**: [`Inventories`], owning every node; store, retrieve, containment and queries
//! - **snapshot**: serializable copy of the authoritative state
//!
//! ## Quantities
//!
//! Amount resources are kilograms of a substance in one phase. Item resources
//! are counted, each piece weighing a fixed mass. Contained units weigh their
//! base mass plus everything inside them.

pub mod arena;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod handle;
pub mod node;
pub mod outcome;
pub mod snapshot;
pub mod storage;

pub use arena::*;
pub use cache::{CacheKind, CacheLayer};
pub use config::*;
pub use directory::UnitDirectory;
pub use error::*;
pub use events::*;
pub use handle::*;
pub use node::*;
pub use outcome::*;
pub use snapshot::*;
pub use storage::*;
