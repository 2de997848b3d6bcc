//! # wardrobe_graph - Equip Ordering
//!
//! Orders an item set so that items which block other slots are put on
//! after the items they block:
//! - **Blocking graph**: one node per interactive slot in the set, with
//!   edges to every slot its item blocks
//! - **Priority**: the length of the longest blocking chain below a slot;
//!   a slot blocking nothing has priority 0
//! - **Sorting**: item sets sort ascending by priority, slots outside the
//!   graph last
//!
//! Cosmetic slots never enter the graph.
//!
//! ## Example
//!
//! ```ignore
//! use wardrobe_graph::prelude::*;
//!
//! let mut items = vec![
//!     ItemDescriptor::new("ItemArms", "Armbinder"),
//!     ItemDescriptor::new("ItemHands", "Mittens"),
//! ];
//! fortune_items_sort(&mut items, &character, &catalog)?;
//! // Mittens first: the armbinder blocks ItemHands
//! ```

pub mod error;
pub mod graph;
pub mod sort;

pub use error::{GraphError, Result};
pub use graph::{BlockGraph, BlockNode};
pub use sort::{fortune_items_sort, items_arg_sort};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{BlockGraph, BlockNode};
    pub use crate::sort::{fortune_items_sort, items_arg_sort};
    pub use wardrobe_inventory::ItemDescriptor;
}
