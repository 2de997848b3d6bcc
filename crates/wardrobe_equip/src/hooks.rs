//! Collaborators an equip transaction calls out to

use wardrobe_inventory::{
    AssetCatalog, CharacterRules, Character, CraftProperty, CraftedItem, InventoryRules, WornItem,
};

/// Difficulty change for secure and loose crafts
pub const CRAFT_DIFFICULTY_STEP: i32 = 4;

/// Side effects of putting items on and finishing a transaction.
///
/// Every method has a default; implementors override what they need.
pub trait EquipHooks {
    /// Apply a declared type to a freshly worn item
    fn set_type(
        &mut self,
        catalog: &dyn AssetCatalog,
        character: &Character,
        item: &mut WornItem,
        type_name: &str,
    ) {
        apply_type(catalog, character, item, type_name);
    }

    /// Apply crafted data to a freshly worn item
    fn craft(&mut self, _character: &Character, item: &mut WornItem, craft: &CraftedItem) {
        apply_craft(item, craft);
    }

    /// Redraw the character; `push` also publishes the new appearance
    fn refresh(&mut self, _character: &Character, _push: bool) {}

    /// Tell others the character changed
    fn notify_update(&mut self, _character: &Character) {}
}

/// Hooks that only apply types and crafts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl EquipHooks for NoopHooks {}

/// Merge a type's baseline properties onto an item and record the type.
///
/// Unknown types leave the item untouched.
pub fn apply_type(catalog: &dyn AssetCatalog, character: &Character, item: &mut WornItem, type_name: &str) {
    match catalog.baseline_property(&item.asset, character, type_name) {
        Some(baseline) => {
            item.property.merge(&baseline);
            item.type_name = Some(type_name.to_string());
        }
        None => log::warn!("{} has no type '{}'", item.asset.name, type_name),
    }
}

/// Apply a craft's color, lock, properties and difficulty change
pub fn apply_craft(item: &mut WornItem, craft: &CraftedItem) {
    if let Some(color) = &craft.color {
        item.color = color.clone();
    }
    if let Some(lock) = &craft.lock {
        item.lock = Some(lock.clone());
    }
    item.property.merge(&craft.item_property);
    match craft.property {
        CraftProperty::Secure => item.difficulty += CRAFT_DIFFICULTY_STEP,
        CraftProperty::Loose => item.difficulty -= CRAFT_DIFFICULTY_STEP,
        _ => {}
    }
}

/// Collaborators of one transaction
pub struct EquipContext<'a> {
    /// Asset lookup
    pub catalog: &'a dyn AssetCatalog,
    /// Permission checks
    pub rules: &'a dyn InventoryRules,
    /// Side effects
    pub hooks: &'a mut dyn EquipHooks,
}

impl<'a> EquipContext<'a> {
    /// Context with the character's own rules
    pub fn new(catalog: &'a dyn AssetCatalog, hooks: &'a mut dyn EquipHooks) -> Self {
        Self {
            catalog,
            rules: &CharacterRules,
            hooks,
        }
    }

    /// Replace the permission checks
    pub fn with_rules(mut self, rules: &'a dyn InventoryRules) -> Self {
        self.rules = rules;
        self
    }
}
