//! Locks and the unlock rule

use crate::character::WornItem;
use serde::{Deserialize, Serialize};

/// A lock placed on a worn item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Lock asset name, e.g. `MetalPadlock`
    pub name: String,
    /// Only the owner may remove it
    #[serde(default)]
    pub owner_only: bool,
    /// Only the owner or a lover may remove it
    #[serde(default)]
    pub lover_only: bool,
    /// Member who applied the lock
    #[serde(default)]
    pub member_number: Option<u32>,
}

impl Lock {
    /// Create a plain lock
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_only: false,
            lover_only: false,
            member_number: None,
        }
    }

    /// Restrict to the owner
    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    /// Restrict to the owner and lovers
    pub fn lover_only(mut self) -> Self {
        self.lover_only = true;
        self
    }

    /// Record who applied the lock
    pub fn by(mut self, member_number: u32) -> Self {
        self.member_number = Some(member_number);
        self
    }

    /// Owner or lover restricted
    pub fn is_restricted(&self) -> bool {
        self.owner_only || self.lover_only
    }
}

/// Whether a worn item may be taken off despite any lock it carries.
///
/// Unlocked items always come off. A locked decoy comes off unless an owner
/// or lover lock holds it; any other locked item stays.
pub fn can_unlock(item: &WornItem) -> bool {
    if !item.has_lock_effect() {
        return true;
    }
    match &item.craft {
        Some(craft) if craft.is_decoy() => item.lock.as_ref().map_or(true, |lock| !lock.is_restricted()),
        _ => false,
    }
}
