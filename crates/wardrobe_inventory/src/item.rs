//! Item descriptors: what an item set asks to be worn

use crate::character::Character;
use crate::craft::CraftedItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use wardrobe_core::{GroupName, PropertyBag};

/// Decides at equip time whether an item should be applied at all
pub type EquipPredicate = Arc<dyn Fn(&Character) -> bool + Send + Sync>;

/// Runs after the item has been put on, with the slot it went into.
///
/// The new instance is worn when this runs; reach it through
/// [`Character::item_mut`].
pub type ItemCallback = Arc<dyn Fn(&GroupName, &mut Character) + Send + Sync>;

/// Stable identity of a descriptor: its slot and asset name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub group: GroupName,
    pub name: String,
}

impl ItemKey {
    pub fn new(group: impl Into<GroupName>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}

/// One entry of an item set.
///
/// Immutable once built; the set that holds it owns it.
#[derive(Clone, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Target slot
    #[serde(rename = "Group")]
    pub group: GroupName,
    /// Asset name
    #[serde(rename = "Name")]
    pub name: String,
    /// Colors, or the asset default when absent
    #[serde(rename = "Color", default)]
    pub color: Option<Vec<String>>,
    /// Crafted data
    #[serde(rename = "Craft", default)]
    pub craft: Option<CraftedItem>,
    /// Declared type
    #[serde(rename = "Type", default)]
    pub type_name: Option<String>,
    /// Properties merged onto the worn instance
    #[serde(rename = "Property", default)]
    pub property: Option<PropertyBag>,
    /// Authored by the user rather than shipped
    #[serde(rename = "Custom", default)]
    pub custom: bool,
    /// Equip predicate; absent means always equip
    #[serde(skip)]
    pub equip: Option<EquipPredicate>,
    /// Post-equip callback
    #[serde(skip)]
    pub callback: Option<ItemCallback>,
}

impl ItemDescriptor {
    /// Create a descriptor for an asset
    pub fn new(group: impl Into<GroupName>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            color: None,
            craft: None,
            type_name: None,
            property: None,
            custom: false,
            equip: None,
            callback: None,
        }
    }

    /// Stable identity
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.group.clone(), self.name.clone())
    }

    /// Set colors
    pub fn with_color(mut self, color: Vec<String>) -> Self {
        self.color = Some(color);
        self
    }

    /// Set crafted data
    pub fn with_craft(mut self, craft: CraftedItem) -> Self {
        self.craft = Some(craft);
        self
    }

    /// Set the declared type
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set properties
    pub fn with_property(mut self, property: PropertyBag) -> Self {
        self.property = Some(property);
        self
    }

    /// Mark as user-authored
    pub fn custom(mut self) -> Self {
        self.custom = true;
        self
    }

    /// Set the equip predicate
    pub fn with_equip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Character) -> bool + Send + Sync + 'static,
    {
        self.equip = Some(Arc::new(predicate));
        self
    }

    /// Set the post-equip callback
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&GroupName, &mut Character) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Evaluate the equip predicate
    pub fn should_equip(&self, character: &Character) -> bool {
        self.equip.as_ref().map_or(true, |predicate| predicate(character))
    }
}

impl fmt::Debug for ItemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDescriptor")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("color", &self.color)
            .field("craft", &self.craft)
            .field("type_name", &self.type_name)
            .field("property", &self.property)
            .field("custom", &self.custom)
            .field("equip", &self.equip.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
