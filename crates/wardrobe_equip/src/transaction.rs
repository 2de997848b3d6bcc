//! Equip transactions - strip, clear, equip, report
//!
//! A transaction owns the working item list and the failure record, and
//! borrows the character exclusively until it finishes. Stages run in a
//! fixed order:
//!
//! 1. **Strip**: remove worn items the strip level allows
//! 2. **Pre-run**: let the caller rewrite the item list
//! 3. **Clearing pass**: free each target slot, or record why it cannot be
//! 4. **Equip pass**: put on every item whose slot was freed
//! 5. **Finish**: refresh, notify, report
//!
//! Both passes walk the list in the caller's order. Sorting by priority
//! beforehand is up to the caller. Nothing is rolled back: items that went
//! on stay on even when others fail.

use crate::error::Result;
use crate::failure::{FailureReason, FailureRecord};
use crate::hooks::EquipContext;
use crate::strip::{character_strip, validate_character, StripLevel};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use wardrobe_core::GroupName;
use wardrobe_inventory::{can_unlock, Character, ItemDescriptor};

/// Callback run for every equipped slot after the item's own callback
pub type GlobalCallback<'c> = &'c dyn Fn(&GroupName, &mut Character);

/// Callback that may rewrite the item list after stripping
pub type PreRunCallback<'c> = &'c dyn Fn(Vec<ItemDescriptor>, &Character) -> Vec<ItemDescriptor>;

/// Progress of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TransactionState {
    /// Created, nothing applied yet
    Pending,
    /// Strip pass done
    Stripped,
    /// Clearing pass done
    Cleared,
    /// Equip pass done
    Equipped,
}

/// Outcome of a transaction
#[derive(Debug, Clone, Serialize)]
pub struct EquipReport {
    /// Transaction display name
    pub name: String,
    /// Slots emptied by the strip pass
    pub stripped: Vec<GroupName>,
    /// Old occupants removed by the clearing pass
    pub cleared: Vec<GroupName>,
    /// Slots that received a new item
    pub equipped: Vec<GroupName>,
    /// Items that could not be equipped
    pub failures: FailureRecord,
}

impl EquipReport {
    /// Check if every item went on
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A two-phase equip of one item set onto one character
pub struct EquipTransaction<'a> {
    name: String,
    items: Vec<ItemDescriptor>,
    character: &'a mut Character,
    ctx: EquipContext<'a>,
    state: TransactionState,
    failures: FailureRecord,
    suppressed: BTreeSet<GroupName>,
    stripped: Vec<GroupName>,
    cleared: Vec<GroupName>,
    equipped: Vec<GroupName>,
}

impl<'a> EquipTransaction<'a> {
    /// Start a transaction.
    ///
    /// Fails without side effects unless the character is the player or a
    /// simple character.
    pub fn new(
        name: impl Into<String>,
        items: Vec<ItemDescriptor>,
        character: &'a mut Character,
        ctx: EquipContext<'a>,
    ) -> Result<Self> {
        validate_character(character)?;
        Ok(Self {
            name: name.into(),
            items,
            character,
            ctx,
            state: TransactionState::Pending,
            failures: FailureRecord::new(),
            suppressed: BTreeSet::new(),
            stripped: Vec::new(),
            cleared: Vec::new(),
            equipped: Vec::new(),
        })
    }

    /// Current stage
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Working item list
    pub fn items(&self) -> &[ItemDescriptor] {
        &self.items
    }

    /// Failures recorded so far
    pub fn failures(&self) -> &FailureRecord {
        &self.failures
    }

    /// Remove worn items the strip level allows
    pub fn strip(&mut self, level: StripLevel) -> Result<()> {
        debug_assert_eq!(self.state, TransactionState::Pending);
        let removed = character_strip(self.character, level)?;
        self.stripped = removed.iter().map(|worn| worn.group().clone()).collect();
        self.state = TransactionState::Stripped;
        Ok(())
    }

    /// Replace the working list with what the callback returns
    pub fn pre_run(&mut self, callback: PreRunCallback<'_>) {
        debug_assert!(self.state < TransactionState::Cleared);
        let items = std::mem::take(&mut self.items);
        self.items = callback(items, self.character);
    }

    /// First pass: free the slot of every item, or record why not.
    ///
    /// Items whose equip predicate says no are suppressed and their slot
    /// is left alone.
    pub fn clear_pass(&mut self) {
        debug_assert!(self.state < TransactionState::Cleared);
        let Self {
            items,
            character,
            ctx,
            failures,
            suppressed,
            cleared,
            ..
        } = self;

        for item in items.iter() {
            let Some(asset) = ctx.catalog.resolve(&character.family, &item.group, &item.name) else {
                log::debug!("Unknown asset {}", item.key());
                failures.record(item.key(), item.name.clone(), FailureReason::UnknownAsset);
                continue;
            };

            if !item.should_equip(character) {
                log::debug!("Equip predicate declined {}", item.key());
                suppressed.insert(item.group.clone());
                continue;
            }

            let group = &asset.group.name;
            let Some(old) = character.item(group) else {
                continue;
            };

            let mut reasons = Vec::new();
            if !can_unlock(old) {
                reasons.push(FailureReason::Locked);
            }
            if ctx.rules.is_blocked_or_limited(character, old) {
                reasons.push(FailureReason::BlockedOrLimited);
            }
            if !ctx.rules.allows(character, &old.asset) {
                reasons.push(FailureReason::NotAllowed);
            }
            if character.group_is_blocked(group) {
                reasons.push(FailureReason::GroupBlocked);
            }

            if reasons.is_empty() {
                if let Some(removed) = character.remove(group) {
                    log::debug!("Cleared {} from {}", removed.asset.name, group);
                    cleared.push(group.clone());
                }
            } else {
                log::debug!("Cannot clear {} for {}: {:?}", group, item.key(), reasons);
                failures.record_all(item.key(), asset.description.clone(), &reasons);
            }
        }

        self.state = TransactionState::Cleared;
    }

    /// Second pass: put on every item that survived the clearing pass.
    ///
    /// Post-processing runs in this order: crafted data, declared type,
    /// craft collaborator, property merge, the item's own callback, then
    /// the global callback. Callbacks run with the new item worn and reach
    /// it through its slot; whatever they do to the character stands.
    pub fn equip_pass(&mut self, global: Option<GlobalCallback<'_>>) {
        debug_assert_eq!(self.state, TransactionState::Cleared);
        let Self {
            items,
            character,
            ctx,
            failures,
            suppressed,
            equipped,
            ..
        } = self;

        for item in items.iter() {
            let Some(asset) = ctx.catalog.resolve(&character.family, &item.group, &item.name) else {
                continue;
            };
            if failures.contains(&item.key()) || suppressed.contains(&item.group) {
                continue;
            }

            let group = asset.group.name.clone();
            let skill = character.bondage_skill;
            character.wear(Arc::clone(&asset), item.color.clone(), skill);

            let Some(index) = character.position(&group) else {
                log::warn!("{} vanished right after being worn", item.key());
                continue;
            };

            // Hooks read the character while writing the instance
            let mut worn = character.appearance.remove(index);
            if let Some(craft) = &item.craft {
                worn.craft = Some(craft.clone());
            }
            if let Some(type_name) = &item.type_name {
                ctx.hooks.set_type(ctx.catalog, character, &mut worn, type_name);
            }
            if let Some(craft) = &item.craft {
                ctx.hooks.craft(character, &mut worn, craft);
            }
            if let Some(property) = &item.property {
                worn.property.merge(property);
            }
            character.appearance.insert(index, worn);

            if let Some(callback) = &item.callback {
                callback(&group, character);
            }
            if let Some(global) = global {
                global(&group, character);
            }

            log::debug!("Equipped {} on {}", item.key(), character.name);
            equipped.push(group);
        }

        self.state = TransactionState::Equipped;
    }

    /// Refresh and notify, then hand back the report.
    ///
    /// The player gets a full refresh, an update broadcast and, when
    /// anything failed, a warning with the failure record. Other
    /// characters get a local refresh only.
    pub fn finish(self) -> EquipReport {
        debug_assert_eq!(self.state, TransactionState::Equipped);
        let Self {
            name,
            character,
            ctx,
            failures,
            stripped,
            cleared,
            equipped,
            ..
        } = self;

        if character.is_player() {
            ctx.hooks.refresh(character, true);
            ctx.hooks.notify_update(character);
            if !failures.is_empty() {
                log::warn!(
                    "{}: {} item(s) could not be equipped: {}",
                    name,
                    failures.len(),
                    failures
                );
            }
        } else {
            ctx.hooks.refresh(character, false);
        }

        EquipReport {
            name,
            stripped,
            cleared,
            equipped,
            failures,
        }
    }
}

/// Strip, clear and equip an item set in one call.
///
/// `pre_run` sees the list after stripping and may return a different
/// one. `global` runs on every equipped item after the item's own
/// callback. Per-item failures are in the report; only an unusable
/// character is an error.
pub fn fortune_wheel_equip<'a>(
    name: &str,
    items: Vec<ItemDescriptor>,
    strip_level: StripLevel,
    global: Option<GlobalCallback<'_>>,
    pre_run: Option<PreRunCallback<'_>>,
    character: &'a mut Character,
    ctx: EquipContext<'a>,
) -> Result<EquipReport> {
    let mut tx = EquipTransaction::new(name, items, character, ctx)?;
    tx.strip(strip_level)?;
    if let Some(pre_run) = pre_run {
        tx.pre_run(pre_run);
    }
    tx.clear_pass();
    tx.equip_pass(global);
    Ok(tx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EquipHooks;
    use parking_lot::Mutex;
    use wardrobe_core::{AssetFamily, PropertyBag, PropertyValue};
    use wardrobe_inventory::{
        AssetCatalog, AssetDef, Catalog, CraftedItem, GroupDef, ItemKey, Lock, WornItem,
    };

    #[derive(Default)]
    struct Recorder {
        refreshes: Vec<bool>,
        notified: usize,
        types: Vec<String>,
    }

    impl EquipHooks for Recorder {
        fn set_type(
            &mut self,
            catalog: &dyn AssetCatalog,
            character: &Character,
            item: &mut WornItem,
            type_name: &str,
        ) {
            self.types.push(type_name.to_string());
            crate::hooks::apply_type(catalog, character, item, type_name);
        }

        fn refresh(&mut self, _character: &Character, push: bool) {
            self.refreshes.push(push);
        }

        fn notify_update(&mut self, _character: &Character) {
            self.notified += 1;
        }
    }

    fn catalog() -> Catalog {
        let family = AssetFamily::default();
        let mut catalog = Catalog::new();
        let arms = GroupDef::item("ItemArms");
        let mouth = GroupDef::item("ItemMouth");
        let head = GroupDef::item("ItemHead");
        let cloth = GroupDef::clothing("Cloth");

        catalog.add_asset(family.clone(), AssetDef::new("HempRope", &arms).with_description("Hemp Rope"));
        catalog.add_asset(family.clone(), AssetDef::new("Armbinder", &arms));
        catalog.add_asset(
            family.clone(),
            AssetDef::new("BallGag", &mouth)
                .with_description("Ball Gag")
                .with_type("Tight", PropertyBag::new().with("Effect", vec!["GagHeavy"])),
        );
        catalog.add_asset(family.clone(), AssetDef::new("Hood", &head).blocks("ItemMouth"));
        catalog.add_asset(family.clone(), AssetDef::new("Dress", &cloth));
        catalog.add_asset(family, AssetDef::new("Jeans", &cloth));
        catalog
    }

    fn wear(character: &mut Character, catalog: &Catalog, group: &str, name: &str) -> usize {
        let asset = catalog
            .resolve(&AssetFamily::default(), &GroupName::new(group), name)
            .unwrap();
        character.wear(asset, None, 0);
        character.appearance.len() - 1
    }

    fn worn_name<'c>(character: &'c Character, group: &str) -> Option<&'c str> {
        character.item(&GroupName::new(group)).map(|w| w.asset.name.as_str())
    }

    #[test]
    fn test_clean_equip_on_player() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        wear(&mut character, &catalog, "Cloth", "Jeans");

        let items = vec![
            ItemDescriptor::new("ItemArms", "HempRope"),
            ItemDescriptor::new("Cloth", "Dress").with_color(vec!["#FF0000".into()]),
        ];
        let report = fortune_wheel_equip(
            "Lucky Spin",
            items,
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.cleared, vec![GroupName::new("Cloth")]);
        assert_eq!(report.equipped.len(), 2);
        assert_eq!(worn_name(&character, "ItemArms"), Some("HempRope"));
        assert_eq!(
            character.item(&GroupName::new("Cloth")).unwrap().color,
            vec!["#FF0000".to_string()]
        );
        assert_eq!(hooks.refreshes, vec![true]);
        assert_eq!(hooks.notified, 1);
    }

    #[test]
    fn test_simple_character_gets_local_refresh_only() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::simple("Maid");

        fortune_wheel_equip(
            "Uniform",
            vec![ItemDescriptor::new("Cloth", "Dress")],
            StripLevel::All,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert_eq!(hooks.refreshes, vec![false]);
        assert_eq!(hooks.notified, 0);
    }

    #[test]
    fn test_online_character_is_untouched() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::new("Bob", wardrobe_inventory::CharacterKind::Online);
        wear(&mut character, &catalog, "Cloth", "Jeans");

        let err = fortune_wheel_equip(
            "Nope",
            vec![ItemDescriptor::new("Cloth", "Dress")],
            StripLevel::All,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap_err();

        assert_eq!(err, crate::error::EquipError::InvalidCharacter("Bob".into()));
        assert_eq!(worn_name(&character, "Cloth"), Some("Jeans"));
        assert!(hooks.refreshes.is_empty());
    }

    #[test]
    fn test_unknown_asset_is_recorded_and_skipped() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");

        let report = fortune_wheel_equip(
            "Typo",
            vec![
                ItemDescriptor::new("ItemArms", "Straitjacket"),
                ItemDescriptor::new("ItemArms", "HempRope"),
            ],
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        let entry = report
            .failures
            .get(&ItemKey::new("ItemArms", "Straitjacket"))
            .unwrap();
        assert_eq!(entry.label, "Straitjacket");
        assert_eq!(entry.reasons, vec![FailureReason::UnknownAsset]);
        assert_eq!(worn_name(&character, "ItemArms"), Some("HempRope"));
    }

    #[test]
    fn test_blocked_slot_and_locked_item_collect_reasons() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        let gag = wear(&mut character, &catalog, "ItemMouth", "BallGag");
        character.appearance[gag].lock = Some(Lock::new("MetalPadlock"));
        wear(&mut character, &catalog, "ItemHead", "Hood");

        let report = fortune_wheel_equip(
            "Muffled",
            vec![ItemDescriptor::new("ItemMouth", "BallGag")],
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        let entry = report.failures.get(&ItemKey::new("ItemMouth", "BallGag")).unwrap();
        assert_eq!(entry.label, "Ball Gag");
        assert_eq!(
            entry.reasons,
            vec![FailureReason::Locked, FailureReason::GroupBlocked]
        );
        assert!(report.equipped.is_empty());
        assert!(character.item(&GroupName::new("ItemMouth")).unwrap().lock.is_some());
    }

    #[test]
    fn test_predicate_suppresses_without_clearing() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        wear(&mut character, &catalog, "ItemArms", "Armbinder");

        let report = fortune_wheel_equip(
            "Maybe",
            vec![ItemDescriptor::new("ItemArms", "HempRope").with_equip(|_| false)],
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert!(report.is_clean());
        assert!(report.equipped.is_empty());
        assert_eq!(worn_name(&character, "ItemArms"), Some("Armbinder"));
    }

    #[test]
    fn test_post_processing_order() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        let seen = Mutex::new(Vec::new());

        let items = vec![ItemDescriptor::new("ItemMouth", "BallGag")
            .with_type("Tight")
            .with_craft(CraftedItem::new("Shiny Gag"))
            .with_property(PropertyBag::new().with("Text", "hello"))
            .with_callback(|group, character| {
                if let Some(worn) = character.item_mut(group) {
                    worn.property.insert("Order", "item");
                }
            })];

        let global = |group: &GroupName, character: &mut Character| {
            let previous = character
                .item(group)
                .and_then(|worn| worn.property.get("Order").cloned());
            seen.lock().push(previous);
            if let Some(worn) = character.item_mut(group) {
                worn.property.insert("Order", "global");
            }
            character.bondage_skill += 1;
        };

        let report = fortune_wheel_equip(
            "Ordered",
            items,
            StripLevel::None,
            Some(&global),
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert!(report.is_clean());
        assert_eq!(hooks.types, vec!["Tight".to_string()]);
        assert_eq!(seen.into_inner(), vec![Some(PropertyValue::from("item"))]);
        assert_eq!(character.bondage_skill, 1);

        let gag = character.item(&GroupName::new("ItemMouth")).unwrap();
        assert_eq!(gag.type_name.as_deref(), Some("Tight"));
        assert!(gag.has_effect("GagHeavy"));
        assert_eq!(gag.property.get("Text"), Some(&PropertyValue::from("hello")));
        assert_eq!(gag.property.get("Order"), Some(&PropertyValue::from("global")));
        assert_eq!(gag.craft.as_ref().map(|c| c.name.as_str()), Some("Shiny Gag"));
    }

    #[test]
    fn test_callbacks_see_the_new_item_worn() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        let seen = Mutex::new(Vec::new());

        let items = vec![ItemDescriptor::new("ItemArms", "HempRope").with_property(
            PropertyBag::new().with("Text", "knotted"),
        )];
        let global = |group: &GroupName, character: &mut Character| {
            let worn = character.item(group).map(|w| w.asset.name.clone());
            seen.lock().push((worn, character.appearance.len()));
        };

        fortune_wheel_equip(
            "Visible",
            items,
            StripLevel::None,
            Some(&global),
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert_eq!(seen.into_inner(), vec![(Some("HempRope".to_string()), 1)]);
    }

    #[test]
    fn test_callback_replacing_the_slot_stands() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        let armbinder = catalog
            .resolve(&AssetFamily::default(), &GroupName::new("ItemArms"), "Armbinder")
            .unwrap();

        let items = vec![ItemDescriptor::new("ItemArms", "HempRope").with_callback(move |_, character| {
            character.wear(Arc::clone(&armbinder), None, 0);
        })];

        fortune_wheel_equip(
            "Swapped",
            items,
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert_eq!(worn_name(&character, "ItemArms"), Some("Armbinder"));
        assert_eq!(character.appearance.len(), 1);
    }

    #[test]
    fn test_callback_emptying_the_slot_stands() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");

        let items = vec![ItemDescriptor::new("ItemArms", "HempRope").with_callback(|group, character| {
            character.remove(group);
        })];

        let report = fortune_wheel_equip(
            "Vanishing",
            items,
            StripLevel::None,
            None,
            None,
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();

        assert_eq!(report.equipped, vec![GroupName::new("ItemArms")]);
        assert_eq!(worn_name(&character, "ItemArms"), None);
        assert!(character.appearance.is_empty());
    }

    #[test]
    fn test_staged_transaction() {
        let catalog = catalog();
        let mut hooks = Recorder::default();
        let mut character = Character::player("Alice");
        wear(&mut character, &catalog, "Cloth", "Jeans");

        let mut tx = EquipTransaction::new(
            "Staged",
            vec![ItemDescriptor::new("ItemArms", "HempRope")],
            &mut character,
            EquipContext::new(&catalog, &mut hooks),
        )
        .unwrap();
        assert_eq!(tx.state(), TransactionState::Pending);

        tx.strip(StripLevel::Clothes).unwrap();
        assert_eq!(tx.state(), TransactionState::Stripped);

        tx.pre_run(&|mut items: Vec<ItemDescriptor>, character: &Character| {
            assert!(character.item(&GroupName::new("Cloth")).is_none());
            items.push(ItemDescriptor::new("Cloth", "Dress"));
            items
        });
        assert_eq!(tx.items().len(), 2);

        tx.clear_pass();
        assert!(tx.failures().is_empty());
        tx.equip_pass(None);

        let report = tx.finish();
        assert_eq!(report.stripped, vec![GroupName::new("Cloth")]);
        assert_eq!(
            report.equipped,
            vec![GroupName::new("ItemArms"), GroupName::new("Cloth")]
        );
        assert_eq!(worn_name(&character, "Cloth"), Some("Dress"));
    }
}
