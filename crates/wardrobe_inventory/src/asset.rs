//! Slot and asset definitions, and the catalog that resolves them

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use wardrobe_core::{AssetFamily, GroupCategory, GroupName, PropertyBag};

/// Effect name marking an item as locked
pub const LOCK_EFFECT: &str = "Lock";

fn default_true() -> bool {
    true
}

/// Static definition of an equipment slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    /// Slot name
    pub name: GroupName,
    /// Cosmetic or interactive
    #[serde(default)]
    pub category: GroupCategory,
    /// Whether the slot may be left empty
    #[serde(default = "default_true")]
    pub allow_none: bool,
    /// Slot holds clothing
    #[serde(default)]
    pub clothing: bool,
    /// Slot holds underwear
    #[serde(default)]
    pub underwear: bool,
    /// Slot holds body cosplay (ears, tails, wings)
    #[serde(default)]
    pub body_cosplay: bool,
}

impl GroupDef {
    /// Create an interactive (restraint) slot
    pub fn item(name: impl Into<GroupName>) -> Self {
        Self {
            name: name.into(),
            category: GroupCategory::Item,
            allow_none: true,
            clothing: false,
            underwear: false,
            body_cosplay: false,
        }
    }

    /// Create a cosmetic slot that may be emptied
    pub fn appearance(name: impl Into<GroupName>) -> Self {
        Self {
            category: GroupCategory::Appearance,
            ..Self::item(name)
        }
    }

    /// Create a clothing slot
    pub fn clothing(name: impl Into<GroupName>) -> Self {
        Self {
            clothing: true,
            ..Self::appearance(name)
        }
    }

    /// Create an underwear slot
    pub fn underwear(name: impl Into<GroupName>) -> Self {
        Self {
            underwear: true,
            ..Self::clothing(name)
        }
    }

    /// Create a body cosplay slot
    pub fn cosplay(name: impl Into<GroupName>) -> Self {
        Self {
            body_cosplay: true,
            ..Self::appearance(name)
        }
    }

    /// Mark the slot as never empty (body parts)
    pub fn required(mut self) -> Self {
        self.allow_none = false;
        self
    }
}

/// A condition an asset places on the character before it may change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prerequisite {
    /// The named slot must be empty
    GroupEmpty(GroupName),
    /// No worn item may carry the named effect
    NoEffect(String),
}

impl Prerequisite {
    /// Check the prerequisite against a character
    pub fn is_met(&self, character: &Character) -> bool {
        match self {
            Self::GroupEmpty(group) => character.item(group).is_none(),
            Self::NoEffect(effect) => !character.appearance.iter().any(|worn| worn.has_effect(effect)),
        }
    }
}

/// Static definition of an equippable item
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDef {
    /// Asset name, unique within its group
    pub name: String,
    /// Slot the asset occupies
    pub group: GroupDef,
    /// Human-readable name
    pub description: String,
    /// Slots this asset blocks while worn
    pub block: Vec<GroupName>,
    /// Intrinsic effects
    pub effect: Vec<String>,
    /// Colors applied when none are given
    pub default_color: Vec<String>,
    /// Base difficulty to struggle out of
    pub difficulty: i32,
    /// Baseline properties per declared type
    pub types: BTreeMap<String, PropertyBag>,
    /// Conditions that must hold to change the item
    pub prerequisites: Vec<Prerequisite>,
}

impl AssetDef {
    /// Create a new asset in the given slot
    pub fn new(name: impl Into<String>, group: &GroupDef) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            group: group.clone(),
            block: Vec::new(),
            effect: Vec::new(),
            default_color: Vec::new(),
            difficulty: 0,
            types: BTreeMap::new(),
            prerequisites: Vec::new(),
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Block another slot
    pub fn blocks(mut self, group: impl Into<GroupName>) -> Self {
        self.block.push(group.into());
        self
    }

    /// Add an intrinsic effect
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect.push(effect.into());
        self
    }

    /// Set default colors
    pub fn with_default_color(mut self, colors: Vec<String>) -> Self {
        self.default_color = colors;
        self
    }

    /// Set base difficulty
    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Declare a type with its baseline properties
    pub fn with_type(mut self, name: impl Into<String>, property: PropertyBag) -> Self {
        self.types.insert(name.into(), property);
        self
    }

    /// Add a prerequisite
    pub fn with_prerequisite(mut self, prerequisite: Prerequisite) -> Self {
        self.prerequisites.push(prerequisite);
        self
    }

    /// Check for an intrinsic effect
    pub fn has_effect(&self, effect: &str) -> bool {
        self.effect.iter().any(|e| e == effect)
    }
}

/// Resolves asset definitions for a character's family
pub trait AssetCatalog {
    /// Look up an asset by family, slot and name
    fn resolve(&self, family: &AssetFamily, group: &GroupName, name: &str) -> Option<Arc<AssetDef>>;

    /// Baseline properties for a declared type of an asset.
    ///
    /// `None` when the asset declares no such type.
    fn baseline_property(
        &self,
        asset: &AssetDef,
        _character: &Character,
        type_name: &str,
    ) -> Option<PropertyBag> {
        asset.types.get(type_name).cloned()
    }
}

/// Catalog file errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Asset references a slot the file does not define
    #[error("Asset '{asset}' references unknown group '{group}'")]
    UnknownGroup { asset: String, group: GroupName },
}

/// On-disk asset entry; the slot is referenced by name
#[derive(Debug, Deserialize)]
struct AssetEntry {
    name: String,
    group: GroupName,
    description: Option<String>,
    #[serde(default)]
    block: Vec<GroupName>,
    #[serde(default)]
    effect: Vec<String>,
    #[serde(default)]
    default_color: Vec<String>,
    #[serde(default)]
    difficulty: i32,
    #[serde(default)]
    types: BTreeMap<String, PropertyBag>,
    #[serde(default)]
    prerequisites: Vec<Prerequisite>,
}

/// On-disk catalog for one family
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    family: AssetFamily,
    groups: Vec<GroupDef>,
    #[serde(default)]
    assets: Vec<AssetEntry>,
}

/// In-memory asset catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: HashMap<(AssetFamily, GroupName), GroupDef>,
    assets: HashMap<(AssetFamily, GroupName, String), Arc<AssetDef>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot definition
    pub fn add_group(&mut self, family: AssetFamily, group: GroupDef) {
        self.groups.insert((family, group.name.clone()), group);
    }

    /// Register an asset, and its slot if not yet known
    pub fn add_asset(&mut self, family: AssetFamily, asset: AssetDef) -> Arc<AssetDef> {
        self.groups
            .entry((family.clone(), asset.group.name.clone()))
            .or_insert_with(|| asset.group.clone());
        let asset = Arc::new(asset);
        self.assets.insert(
            (family, asset.group.name.clone(), asset.name.clone()),
            Arc::clone(&asset),
        );
        asset
    }

    /// Get a slot definition
    pub fn group(&self, family: &AssetFamily, group: &GroupName) -> Option<&GroupDef> {
        self.groups.get(&(family.clone(), group.clone()))
    }

    /// Number of registered assets
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Parse one family's catalog from JSON and add it
    pub fn load_json(&mut self, content: &str) -> Result<usize, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let groups: HashMap<GroupName, GroupDef> = file
            .groups
            .into_iter()
            .map(|g| (g.name.clone(), g))
            .collect();

        let mut added = 0;
        for entry in file.assets {
            let group = groups.get(&entry.group).ok_or_else(|| CatalogError::UnknownGroup {
                asset: entry.name.clone(),
                group: entry.group.clone(),
            })?;
            let asset = AssetDef {
                description: entry.description.unwrap_or_else(|| entry.name.clone()),
                name: entry.name,
                group: group.clone(),
                block: entry.block,
                effect: entry.effect,
                default_color: entry.default_color,
                difficulty: entry.difficulty,
                types: entry.types,
                prerequisites: entry.prerequisites,
            };
            self.add_asset(file.family.clone(), asset);
            added += 1;
        }
        for (_, group) in groups {
            self.add_group(file.family.clone(), group);
        }

        log::debug!("Loaded {} assets for family {}", added, file.family);
        Ok(added)
    }

    /// Load a catalog file from disk
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.load_json(&content)
    }
}

impl AssetCatalog for Catalog {
    fn resolve(&self, family: &AssetFamily, group: &GroupName, name: &str) -> Option<Arc<AssetDef>> {
        self.assets
            .get(&(family.clone(), group.clone(), name.to_string()))
            .cloned()
    }
}
