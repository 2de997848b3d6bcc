//! Strip policy - which worn items a strip pass removes

use crate::error::{EquipError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wardrobe_core::GroupName;
use wardrobe_inventory::{AssetDef, Character, WornItem};

/// How much to take off before a new item set goes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum StripLevel {
    /// Remove nothing
    None = 0,
    /// Remove clothes, keep underwear and cosplay
    Clothes = 1,
    /// Remove clothes and underwear
    Underwear = 2,
    /// Also remove body cosplay, unless the character blocks it
    Cosplay = 3,
    /// Remove everything removable; cosplay still follows the character's flag
    All = 4,
}

impl Default for StripLevel {
    fn default() -> Self {
        Self::None
    }
}

impl TryFrom<u8> for StripLevel {
    type Error = EquipError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Clothes),
            2 => Ok(Self::Underwear),
            3 => Ok(Self::Cosplay),
            4 => Ok(Self::All),
            _ => Err(EquipError::InvalidStripLevel(value)),
        }
    }
}

impl FromStr for StripLevel {
    type Err = EquipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "clothes" => Ok(Self::Clothes),
            "underwear" => Ok(Self::Underwear),
            "cosplay" => Ok(Self::Cosplay),
            "all" => Ok(Self::All),
            other => match other.parse::<u8>() {
                Ok(n) => Self::try_from(n),
                Err(_) => Err(EquipError::UnknownStripLevel(s.to_string())),
            },
        }
    }
}

impl fmt::Display for StripLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Clothes => write!(f, "clothes"),
            Self::Underwear => write!(f, "underwear"),
            Self::Cosplay => write!(f, "cosplay"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Removal predicate for one strip level and one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripFilter {
    level: StripLevel,
    block_cosplay: bool,
}

impl StripFilter {
    /// Strip level this filter applies
    pub fn level(&self) -> StripLevel {
        self.level
    }

    /// Whether a worn asset is eligible for removal.
    ///
    /// Only cosmetic slots that may be left empty are ever eligible. From
    /// `Cosplay` up the character's cosplay flag decides for cosplay slots.
    pub fn matches(&self, asset: &AssetDef) -> bool {
        let group = &asset.group;
        if !group.category.is_appearance() || !group.allow_none {
            return false;
        }

        let cosplay_allowed = !group.body_cosplay || !self.block_cosplay;
        match self.level {
            StripLevel::None => false,
            StripLevel::Clothes => !group.underwear && !group.body_cosplay,
            StripLevel::Underwear => !group.body_cosplay,
            StripLevel::Cosplay | StripLevel::All => cosplay_allowed,
        }
    }
}

/// Check that a character may be changed at all
pub fn validate_character(character: &Character) -> Result<()> {
    if character.is_player() || character.is_simple() {
        Ok(())
    } else {
        Err(EquipError::InvalidCharacter(character.name.clone()))
    }
}

/// Build the removal predicate for a character
pub fn strip_filter(level: StripLevel, character: &Character) -> Result<StripFilter> {
    validate_character(character)?;
    Ok(StripFilter {
        level,
        block_cosplay: character.shared.block_body_cosplay,
    })
}

/// Remove every worn item the strip level allows.
///
/// Returns the removed items in their original appearance order.
pub fn character_strip(character: &mut Character, level: StripLevel) -> Result<Vec<WornItem>> {
    let filter = strip_filter(level, character)?;

    let mut removed = Vec::new();
    for index in (0..character.appearance.len()).rev() {
        if filter.matches(&character.appearance[index].asset) {
            removed.push(character.appearance.remove(index));
        }
    }
    removed.reverse();

    if !removed.is_empty() {
        log::debug!(
            "Stripped {} item(s) from {} at level {}: {:?}",
            removed.len(),
            character.name,
            level,
            removed.iter().map(WornItem::group).collect::<Vec<&GroupName>>()
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wardrobe_inventory::{CharacterKind, GroupDef};

    fn dressed(kind: CharacterKind) -> Character {
        let mut character = Character::new("Alice", kind);
        let groups = [
            GroupDef::clothing("Cloth"),
            GroupDef::underwear("Bra"),
            GroupDef::cosplay("TailStraps"),
            GroupDef::appearance("Glasses"),
            GroupDef::appearance("BodyUpper").required(),
            GroupDef::item("ItemArms"),
        ];
        for group in &groups {
            character.wear(Arc::new(AssetDef::new("Thing", group)), None, 0);
        }
        character
    }

    fn worn_groups(character: &Character) -> Vec<&str> {
        character.appearance.iter().map(|w| w.group().as_str()).collect()
    }

    #[test]
    fn test_level_ordering_and_parsing() {
        assert!(StripLevel::None < StripLevel::Clothes);
        assert!(StripLevel::Cosplay < StripLevel::All);
        assert_eq!("underwear".parse::<StripLevel>().unwrap(), StripLevel::Underwear);
        assert_eq!("3".parse::<StripLevel>().unwrap(), StripLevel::Cosplay);
        assert_eq!(StripLevel::try_from(4).unwrap(), StripLevel::All);
        assert_eq!(StripLevel::try_from(7), Err(EquipError::InvalidStripLevel(7)));
        assert!(matches!(
            "naked".parse::<StripLevel>(),
            Err(EquipError::UnknownStripLevel(_))
        ));
    }

    #[test]
    fn test_none_removes_nothing() {
        let mut character = dressed(CharacterKind::Player);
        let removed = character_strip(&mut character, StripLevel::None).unwrap();
        assert!(removed.is_empty());
        assert_eq!(character.appearance.len(), 6);
    }

    #[test]
    fn test_clothes_takes_cosmetics_keeps_underwear_and_cosplay() {
        let mut character = dressed(CharacterKind::Player);
        character.shared.block_body_cosplay = false;
        character_strip(&mut character, StripLevel::Clothes).unwrap();
        assert_eq!(
            worn_groups(&character),
            vec!["Bra", "TailStraps", "BodyUpper", "ItemArms"]
        );
        assert!(character.item(&GroupName::new("Glasses")).is_none());
    }

    #[test]
    fn test_underwear() {
        let mut character = dressed(CharacterKind::Simple);
        let removed = character_strip(&mut character, StripLevel::Underwear).unwrap();
        let removed: Vec<&str> = removed.iter().map(|w| w.group().as_str()).collect();
        assert_eq!(removed, vec!["Cloth", "Bra", "Glasses"]);
    }

    #[test]
    fn test_cosplay_follows_flag() {
        let mut character = dressed(CharacterKind::Player);
        character_strip(&mut character, StripLevel::Cosplay).unwrap();
        assert!(character.item(&GroupName::new("TailStraps")).is_some());
        assert!(character.item(&GroupName::new("Glasses")).is_none());

        let mut character = dressed(CharacterKind::Player);
        character.shared.block_body_cosplay = false;
        character_strip(&mut character, StripLevel::Cosplay).unwrap();
        assert!(character.item(&GroupName::new("TailStraps")).is_none());
        assert_eq!(worn_groups(&character), vec!["BodyUpper", "ItemArms"]);
    }

    #[test]
    fn test_all_removes_cosplay_only_when_unblocked() {
        let mut character = dressed(CharacterKind::Player);
        character_strip(&mut character, StripLevel::All).unwrap();
        assert_eq!(worn_groups(&character), vec!["TailStraps", "BodyUpper", "ItemArms"]);

        let mut character = dressed(CharacterKind::Player);
        character.shared.block_body_cosplay = false;
        character_strip(&mut character, StripLevel::All).unwrap();
        assert_eq!(worn_groups(&character), vec!["BodyUpper", "ItemArms"]);
    }

    #[test]
    fn test_filter_skips_required_and_item_slots() {
        let character = dressed(CharacterKind::Player);
        let filter = strip_filter(StripLevel::All, &character).unwrap();
        assert_eq!(filter.level(), StripLevel::All);
        let eligible: Vec<&str> = character
            .appearance
            .iter()
            .filter(|w| filter.matches(&w.asset))
            .map(|w| w.group().as_str())
            .collect();
        assert_eq!(eligible, vec!["Cloth", "Bra", "Glasses"]);
    }

    #[test]
    fn test_online_character_rejected() {
        let mut character = dressed(CharacterKind::Online);
        let err = character_strip(&mut character, StripLevel::All).unwrap_err();
        assert_eq!(err, EquipError::InvalidCharacter("Alice".into()));
        assert_eq!(character.appearance.len(), 6);
    }
}
