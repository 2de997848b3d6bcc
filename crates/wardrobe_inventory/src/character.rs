//! Characters and the items they wear

use crate::asset::{AssetCatalog, AssetDef, LOCK_EFFECT};
use crate::craft::CraftedItem;
use crate::lock::Lock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use wardrobe_core::{AssetFamily, GroupName, PropertyBag};

/// A live item instance in a character's appearance
#[derive(Debug, Clone, PartialEq)]
pub struct WornItem {
    /// Static definition
    pub asset: Arc<AssetDef>,
    /// Applied colors
    pub color: Vec<String>,
    /// Difficulty to struggle out of
    pub difficulty: i32,
    /// Declared type, if any
    pub type_name: Option<String>,
    /// Instance properties
    pub property: PropertyBag,
    /// Crafted data
    pub craft: Option<CraftedItem>,
    /// Lock, if locked
    pub lock: Option<Lock>,
}

impl WornItem {
    /// Create a new instance with the asset's defaults
    pub fn new(asset: Arc<AssetDef>) -> Self {
        Self {
            color: asset.default_color.clone(),
            difficulty: asset.difficulty,
            asset,
            type_name: None,
            property: PropertyBag::new(),
            craft: None,
            lock: None,
        }
    }

    /// Slot this item occupies
    pub fn group(&self) -> &GroupName {
        &self.asset.group.name
    }

    /// Check for an effect, intrinsic or from properties
    pub fn has_effect(&self, effect: &str) -> bool {
        self.asset.has_effect(effect) || self.property.has_effect(effect)
    }

    /// Check whether the item counts as locked
    pub fn has_lock_effect(&self) -> bool {
        self.lock.is_some() || self.has_effect(LOCK_EFFECT)
    }

    /// Slots this item blocks: the asset's list plus any from properties
    pub fn effective_block(&self) -> BTreeSet<GroupName> {
        self.asset
            .block
            .iter()
            .cloned()
            .chain(self.property.block())
            .collect()
    }

    /// Convert to a serializable record
    pub fn to_record(&self) -> WornRecord {
        WornRecord {
            group: self.group().clone(),
            name: self.asset.name.clone(),
            color: self.color.clone(),
            difficulty: self.difficulty,
            type_name: self.type_name.clone(),
            property: self.property.clone(),
            craft: self.craft.clone(),
            lock: self.lock.clone(),
        }
    }
}

/// Serializable form of a worn item; the asset is referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WornRecord {
    pub group: GroupName,
    pub name: String,
    #[serde(default)]
    pub color: Vec<String>,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub property: PropertyBag,
    #[serde(default)]
    pub craft: Option<CraftedItem>,
    #[serde(default)]
    pub lock: Option<Lock>,
}

/// What kind of character this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    /// The local player
    Player,
    /// A locally simulated character
    Simple,
    /// Another player's character, mirrored from elsewhere
    Online,
}

/// Settings the character shares with others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSettings {
    /// Body cosplay may not be removed by strip passes
    #[serde(default = "default_block_cosplay")]
    pub block_body_cosplay: bool,
}

fn default_block_cosplay() -> bool {
    true
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self {
            block_body_cosplay: true,
        }
    }
}

/// Per-character item permissions, keyed by `Group/Name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Items nobody may use on this character
    #[serde(default)]
    pub blocked: BTreeSet<String>,
    /// Items only trusted members may use on this character
    #[serde(default)]
    pub limited: BTreeSet<String>,
}

impl Permissions {
    fn key(group: &GroupName, name: &str) -> String {
        format!("{}/{}", group, name)
    }

    /// Block an item
    pub fn block(&mut self, group: &GroupName, name: &str) {
        self.blocked.insert(Self::key(group, name));
    }

    /// Limit an item
    pub fn limit(&mut self, group: &GroupName, name: &str) {
        self.limited.insert(Self::key(group, name));
    }

    /// Check if an item is blocked
    pub fn is_blocked(&self, group: &GroupName, name: &str) -> bool {
        self.blocked.contains(&Self::key(group, name))
    }

    /// Check if an item is limited
    pub fn is_limited(&self, group: &GroupName, name: &str) -> bool {
        self.limited.contains(&Self::key(group, name))
    }
}

/// The target of equip operations
#[derive(Debug, Clone)]
pub struct Character {
    /// Display name
    pub name: String,
    /// Member number
    pub member_number: Option<u32>,
    /// Player, simple or online
    pub kind: CharacterKind,
    /// Asset family used for lookups
    pub family: AssetFamily,
    /// Worn items, in draw order
    pub appearance: Vec<WornItem>,
    /// Shared settings
    pub shared: SharedSettings,
    /// Item permissions
    pub permissions: Permissions,
    /// Bondage skill level
    pub bondage_skill: i32,
}

impl Character {
    /// Create a character of the given kind
    pub fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            name: name.into(),
            member_number: None,
            kind,
            family: AssetFamily::default(),
            appearance: Vec::new(),
            shared: SharedSettings::default(),
            permissions: Permissions::default(),
            bondage_skill: 0,
        }
    }

    /// Create the player character
    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Player)
    }

    /// Create a simple character
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Simple)
    }

    /// Check if this is the player
    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    /// Check if this is a simple character
    pub fn is_simple(&self) -> bool {
        self.kind == CharacterKind::Simple
    }

    /// Item in a slot
    pub fn item(&self, group: &GroupName) -> Option<&WornItem> {
        self.appearance.iter().find(|worn| worn.group() == group)
    }

    /// Mutable item in a slot
    pub fn item_mut(&mut self, group: &GroupName) -> Option<&mut WornItem> {
        self.appearance.iter_mut().find(|worn| worn.group() == group)
    }

    /// Index of the item in a slot
    pub fn position(&self, group: &GroupName) -> Option<usize> {
        self.appearance.iter().position(|worn| worn.group() == group)
    }

    /// Remove the item in a slot
    pub fn remove(&mut self, group: &GroupName) -> Option<WornItem> {
        let index = self.position(group)?;
        Some(self.appearance.remove(index))
    }

    /// Put an asset on, replacing whatever the slot held.
    ///
    /// The new item goes to the end of the appearance sequence.
    pub fn wear(&mut self, asset: Arc<AssetDef>, color: Option<Vec<String>>, skill_bonus: i32) -> &mut WornItem {
        self.remove(&asset.group.name);

        let mut item = WornItem::new(asset);
        if let Some(color) = color {
            item.color = color;
        }
        item.difficulty += skill_bonus;
        self.appearance.push(item);

        let last = self.appearance.len() - 1;
        &mut self.appearance[last]
    }

    /// Whether another worn item blocks the slot
    pub fn group_is_blocked(&self, group: &GroupName) -> bool {
        self.appearance
            .iter()
            .filter(|worn| worn.group() != group)
            .any(|worn| worn.effective_block().contains(group))
    }

    /// Convert to a serializable record
    pub fn to_record(&self) -> CharacterRecord {
        CharacterRecord {
            name: self.name.clone(),
            member_number: self.member_number,
            kind: self.kind,
            family: self.family.clone(),
            appearance: self.appearance.iter().map(WornItem::to_record).collect(),
            shared: self.shared.clone(),
            permissions: self.permissions.clone(),
            bondage_skill: self.bondage_skill,
        }
    }

    /// Rebuild a character from a record.
    ///
    /// Worn items whose asset the catalog cannot resolve are dropped and
    /// returned by name.
    pub fn from_record(record: CharacterRecord, catalog: &dyn AssetCatalog) -> (Self, Vec<WornRecord>) {
        let mut character = Self {
            name: record.name,
            member_number: record.member_number,
            kind: record.kind,
            family: record.family,
            appearance: Vec::with_capacity(record.appearance.len()),
            shared: record.shared,
            permissions: record.permissions,
            bondage_skill: record.bondage_skill,
        };

        let mut dropped = Vec::new();
        for worn in record.appearance {
            match catalog.resolve(&character.family, &worn.group, &worn.name) {
                Some(asset) => character.appearance.push(WornItem {
                    asset,
                    color: worn.color,
                    difficulty: worn.difficulty,
                    type_name: worn.type_name,
                    property: worn.property,
                    craft: worn.craft,
                    lock: worn.lock,
                }),
                None => {
                    log::warn!("Dropping unknown worn item {}/{}", worn.group, worn.name);
                    dropped.push(worn);
                }
            }
        }

        (character, dropped)
    }
}

/// Serializable form of a character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    #[serde(default)]
    pub member_number: Option<u32>,
    pub kind: CharacterKind,
    #[serde(default)]
    pub family: AssetFamily,
    #[serde(default)]
    pub appearance: Vec<WornRecord>,
    #[serde(default)]
    pub shared: SharedSettings,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub bondage_skill: i32,
}
