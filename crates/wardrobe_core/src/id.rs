//! Slot and family identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of an equipment slot (asset group) on a character.
///
/// A slot holds at most one occupying item. Names are case-sensitive and
/// compared by value, so `GroupName::new("ItemArms")` from two different
/// sources refer to the same slot.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    /// Create a new group name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupName({})", self.0)
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for GroupName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for GroupName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Asset family a character belongs to.
///
/// Catalog lookups are keyed by `(family, group, name)`; two families may
/// define assets with the same group and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetFamily(String);

impl AssetFamily {
    /// Create a new family name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssetFamily {
    fn default() -> Self {
        Self::new("Female3DCG")
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetFamily {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Slot category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupCategory {
    /// Cosmetic slots (clothes, underwear, body cosplay)
    Appearance,
    /// Interactive slots (restraints, toys)
    Item,
    /// Slots that are neither, e.g. script-only groups
    Other,
}

impl Default for GroupCategory {
    fn default() -> Self {
        Self::Appearance
    }
}

impl GroupCategory {
    /// Check if this is the cosmetic category
    pub fn is_appearance(&self) -> bool {
        matches!(self, Self::Appearance)
    }

    /// Check if this is the interactive category
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item)
    }
}
