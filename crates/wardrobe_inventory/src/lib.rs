//! Wardrobe Inventory - Assets, Worn Items and Characters
//!
//! This crate provides the data model the equip engine operates on.
//!
//! # Features
//!
//! - Slot (group) and asset definitions with blocking relationships
//! - Catalog lookup by `(family, group, name)`
//! - Item descriptors with optional equip predicates and callbacks
//! - Crafted item data and lock rules
//! - Characters with an ordered appearance sequence
//! - Inventory rules (blocked/limited lists, prerequisites)
//!
//! # Example
//!
//! ```ignore
//! use wardrobe_inventory::prelude::*;
//!
//! let arms = GroupDef::item("ItemArms");
//! let mut catalog = Catalog::new();
//! catalog.add_asset(AssetFamily::default(), AssetDef::new("HempRope", &arms));
//!
//! let mut character = Character::player("Alice");
//! let rope = catalog.resolve(&character.family, &arms.name, "HempRope").unwrap();
//! character.wear(rope, None, 0);
//! ```

pub mod asset;
pub mod character;
pub mod craft;
pub mod item;
pub mod lock;
pub mod rules;

pub mod prelude {
    pub use crate::asset::{AssetCatalog, AssetDef, Catalog, CatalogError, GroupDef, Prerequisite};
    pub use crate::character::{
        Character, CharacterKind, CharacterRecord, Permissions, SharedSettings, WornItem, WornRecord,
    };
    pub use crate::craft::{CraftProperty, CraftedItem};
    pub use crate::item::{EquipPredicate, ItemCallback, ItemDescriptor, ItemKey};
    pub use crate::lock::{can_unlock, Lock};
    pub use crate::rules::{CharacterRules, InventoryRules};
}

pub use prelude::*;
pub use wardrobe_core::{AssetFamily, GroupCategory, GroupName, PropertyBag, PropertyValue};
