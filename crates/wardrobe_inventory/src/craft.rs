//! Crafted item data

use crate::lock::Lock;
use serde::{Deserialize, Serialize};
use wardrobe_core::PropertyBag;

/// Special property a crafter gave an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftProperty {
    /// No special property
    Normal,
    /// Looks locked but gives way to anyone not bound by an owner or lover lock
    Decoy,
    /// Harder to struggle out of
    Secure,
    /// Easier to struggle out of
    Loose,
    /// Bigger gag or plug
    Large,
    /// Smaller gag or plug
    Small,
    /// Arousal gain is higher
    Arousing,
    /// Arousal gain is lower
    Dull,
}

impl Default for CraftProperty {
    fn default() -> Self {
        Self::Normal
    }
}

/// Crafted-item payload attached to a worn item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CraftedItem {
    /// Name the crafter gave the item
    pub name: String,
    /// Crafter's description
    #[serde(default)]
    pub description: String,
    /// Crafter's member number
    #[serde(default)]
    pub member_number: Option<u32>,
    /// Special property
    #[serde(default)]
    pub property: CraftProperty,
    /// Color override
    #[serde(default)]
    pub color: Option<Vec<String>>,
    /// Lock applied when the item is worn
    #[serde(default)]
    pub lock: Option<Lock>,
    /// Extra properties applied when the item is worn
    #[serde(default)]
    pub item_property: PropertyBag,
}

impl CraftedItem {
    /// Create crafted data with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the special property
    pub fn with_property(mut self, property: CraftProperty) -> Self {
        self.property = property;
        self
    }

    /// Set a lock
    pub fn with_lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Set a color override
    pub fn with_color(mut self, color: Vec<String>) -> Self {
        self.color = Some(color);
        self
    }

    /// Check if this is a decoy
    pub fn is_decoy(&self) -> bool {
        self.property == CraftProperty::Decoy
    }
}
