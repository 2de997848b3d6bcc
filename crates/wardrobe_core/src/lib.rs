//! # wardrobe_core - Wardrobe Core
//!
//! Shared primitives used by every wardrobe crate:
//! - **Identifiers**: equipment slot names and asset families
//! - **Categories**: which slots are cosmetic and which are interactive
//! - **Properties**: the free-form property bag carried by worn items

pub mod id;
pub mod property;

pub use id::*;
pub use property::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{AssetFamily, GroupCategory, GroupName};
    pub use crate::property::{PropertyBag, PropertyValue};
}
