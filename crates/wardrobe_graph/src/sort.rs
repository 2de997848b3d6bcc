//! Sorting item sets by equip priority

use crate::error::Result;
use crate::graph::BlockGraph;
use std::collections::BTreeMap;
use wardrobe_core::GroupName;
use wardrobe_inventory::{AssetCatalog, Character, ItemDescriptor};

/// Compute the equip priority of every interactive slot in an item set.
///
/// Fails on the first descriptor the catalog cannot resolve, or on a
/// blocking cycle; callers must not use a partial ordering. Cosmetic slots
/// are absent from the result.
pub fn items_arg_sort(
    items: &[ItemDescriptor],
    character: &Character,
    catalog: &dyn AssetCatalog,
) -> Result<BTreeMap<GroupName, u32>> {
    let mut graph = BlockGraph::build(items, character, catalog)?;
    let priorities = graph.resolve()?;
    log::debug!("Resolved equip priorities: {:?}", priorities);
    Ok(priorities)
}

/// Sort an item set in place, lowest priority first.
///
/// Items without a priority go last. The sort is stable, so items of equal
/// priority keep their relative order.
pub fn fortune_items_sort<'a>(
    items: &'a mut [ItemDescriptor],
    character: &Character,
    catalog: &dyn AssetCatalog,
) -> Result<&'a mut [ItemDescriptor]> {
    let priorities = items_arg_sort(items, character, catalog)?;
    items.sort_by_key(|item| match priorities.get(&item.group) {
        Some(&priority) => (false, priority),
        None => (true, 0),
    });
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use wardrobe_core::{AssetFamily, PropertyBag};
    use wardrobe_inventory::{AssetDef, Catalog, GroupDef};

    fn catalog() -> Catalog {
        let family = AssetFamily::default();
        let mut catalog = Catalog::new();

        let arms = GroupDef::item("ItemArms");
        let hands = GroupDef::item("ItemHands");
        let torso = GroupDef::item("ItemTorso");
        let feet = GroupDef::item("ItemFeet");
        let cloth = GroupDef::clothing("Cloth");

        catalog.add_asset(
            family.clone(),
            AssetDef::new("Armbinder", &arms).blocks("ItemHands"),
        );
        catalog.add_asset(family.clone(), AssetDef::new("Mittens", &hands));
        catalog.add_asset(
            family.clone(),
            AssetDef::new("Harness", &torso)
                .blocks("ItemArms")
                .with_type("Strict", PropertyBag::new().with("Block", vec!["ItemFeet"])),
        );
        catalog.add_asset(family.clone(), AssetDef::new("Chains", &feet));
        catalog.add_asset(family, AssetDef::new("Dress", &cloth).blocks("ItemArms"));
        catalog
    }

    fn names(items: &[ItemDescriptor]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_arg_sort() {
        let character = Character::player("Alice");
        let items = vec![
            ItemDescriptor::new("ItemTorso", "Harness"),
            ItemDescriptor::new("ItemArms", "Armbinder"),
            ItemDescriptor::new("ItemHands", "Mittens"),
            ItemDescriptor::new("Cloth", "Dress"),
        ];

        let priorities = items_arg_sort(&items, &character, &catalog()).unwrap();
        assert_eq!(priorities[&GroupName::new("ItemHands")], 0);
        assert_eq!(priorities[&GroupName::new("ItemArms")], 1);
        assert_eq!(priorities[&GroupName::new("ItemTorso")], 2);
        assert!(!priorities.contains_key(&GroupName::new("Cloth")));
    }

    #[test]
    fn test_type_adds_blocks() {
        let character = Character::player("Alice");
        let items = vec![
            ItemDescriptor::new("ItemTorso", "Harness").with_type("Strict"),
            ItemDescriptor::new("ItemFeet", "Chains"),
        ];

        let mut graph = BlockGraph::build(&items, &character, &catalog()).unwrap();
        let torso = graph.get(&GroupName::new("ItemTorso")).unwrap();
        assert!(torso.blocks.contains(&GroupName::new("ItemFeet")));
        assert!(torso.blocks.contains(&GroupName::new("ItemArms")));

        let priorities = graph.resolve().unwrap();
        assert_eq!(priorities[&GroupName::new("ItemTorso")], 1);
    }

    #[test]
    fn test_unknown_asset_aborts() {
        let character = Character::player("Alice");
        let items = vec![
            ItemDescriptor::new("ItemHands", "Mittens"),
            ItemDescriptor::new("ItemHands", "Gloves"),
        ];

        let err = items_arg_sort(&items, &character, &catalog()).unwrap_err();
        assert!(matches!(err, GraphError::UnknownAsset { ref name, .. } if name == "Gloves"));
    }

    #[test]
    fn test_fortune_items_sort_orders_ascending() {
        let character = Character::player("Alice");
        let mut items = vec![
            ItemDescriptor::new("Cloth", "Dress"),
            ItemDescriptor::new("ItemTorso", "Harness"),
            ItemDescriptor::new("ItemArms", "Armbinder"),
            ItemDescriptor::new("ItemFeet", "Chains"),
            ItemDescriptor::new("ItemHands", "Mittens"),
        ];

        let sorted = fortune_items_sort(&mut items, &character, &catalog()).unwrap();
        // Chains and Mittens tie at 0 and keep their input order; Dress is unranked
        assert_eq!(
            names(sorted),
            vec!["Chains", "Mittens", "Armbinder", "Harness", "Dress"]
        );
    }

    #[test]
    fn test_sorted_sequence_is_non_decreasing() {
        let character = Character::player("Alice");
        let catalog = catalog();
        let mut items = vec![
            ItemDescriptor::new("ItemArms", "Armbinder"),
            ItemDescriptor::new("Cloth", "Dress"),
            ItemDescriptor::new("ItemHands", "Mittens"),
            ItemDescriptor::new("ItemTorso", "Harness").with_type("Strict"),
            ItemDescriptor::new("ItemFeet", "Chains"),
        ];

        let priorities = items_arg_sort(&items, &character, &catalog).unwrap();
        fortune_items_sort(&mut items, &character, &catalog).unwrap();

        let ranks: Vec<Option<u32>> = items.iter().map(|i| priorities.get(&i.group).copied()).collect();
        let first_unranked = ranks.iter().position(Option::is_none).unwrap_or(ranks.len());
        assert!(ranks[first_unranked..].iter().all(Option::is_none));
        assert!(ranks[..first_unranked].windows(2).all(|w| w[0] <= w[1]));
    }
}
