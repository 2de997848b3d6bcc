//! Error types for equip ordering

use thiserror::Error;
use wardrobe_core::{AssetFamily, GroupName};

/// Ordering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An item set names an asset the catalog does not know
    #[error("Unknown asset {group}/{name} in family {family}")]
    UnknownAsset {
        family: AssetFamily,
        group: GroupName,
        name: String,
    },

    /// Blocking relationships loop back on themselves
    #[error("Blocking cycle through {groups:?}")]
    Cycle { groups: Vec<GroupName> },
}

/// Result type for ordering operations
pub type Result<T> = std::result::Result<T, GraphError>;
