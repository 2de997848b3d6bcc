//! Inventory rules consulted before an item may change

use crate::asset::AssetDef;
use crate::character::{Character, WornItem};

/// Permission checks on a character's items
pub trait InventoryRules {
    /// The item is on the character's blocked or limited list
    fn is_blocked_or_limited(&self, character: &Character, item: &WornItem) -> bool;

    /// The asset's prerequisites allow it to change on this character
    fn allows(&self, character: &Character, asset: &AssetDef) -> bool;
}

/// Rules read straight from the character's permissions and the asset's
/// prerequisites
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterRules;

impl InventoryRules for CharacterRules {
    fn is_blocked_or_limited(&self, character: &Character, item: &WornItem) -> bool {
        let group = item.group();
        let name = &item.asset.name;
        character.permissions.is_blocked(group, name) || character.permissions.is_limited(group, name)
    }

    fn allows(&self, character: &Character, asset: &AssetDef) -> bool {
        asset.prerequisites.iter().all(|p| p.is_met(character))
    }
}
