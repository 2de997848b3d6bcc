//! Per-item failure bookkeeping

use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use wardrobe_inventory::ItemKey;

/// Why an item could not be equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The catalog does not know the asset
    UnknownAsset,
    /// The slot holds a lock that cannot be undone
    Locked,
    /// The slot holds an item on the blocked or limited list
    BlockedOrLimited,
    /// The slot's item fails its prerequisites
    NotAllowed,
    /// Another worn item blocks the slot
    GroupBlocked,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownAsset => "Unknown asset",
            Self::Locked => "Locked item equiped",
            Self::BlockedOrLimited => "Blocked or limited item equiped",
            Self::NotAllowed => "Not allowed to change item",
            Self::GroupBlocked => "Blocked slot",
        };
        f.write_str(text)
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Failures recorded against one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    /// Display name: the asset description, or the raw name if unresolved
    pub label: String,
    /// Distinct reasons in detection order
    pub reasons: Vec<FailureReason>,
}

/// Failures of one transaction, keyed by item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureRecord {
    entries: BTreeMap<ItemKey, FailureEntry>,
}

impl FailureRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reason against an item; repeated reasons are kept once
    pub fn record(&mut self, key: ItemKey, label: impl Into<String>, reason: FailureReason) {
        let entry = self.entries.entry(key).or_insert_with(|| FailureEntry {
            label: label.into(),
            reasons: Vec::new(),
        });
        if !entry.reasons.contains(&reason) {
            entry.reasons.push(reason);
        }
    }

    /// Record several reasons, preserving their order
    pub fn record_all(&mut self, key: ItemKey, label: impl Into<String>, reasons: &[FailureReason]) {
        let label = label.into();
        for &reason in reasons {
            self.record(key.clone(), label.clone(), reason);
        }
    }

    /// Check if an item has failed
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Get an item's failures
    pub fn get(&self, key: &ItemKey) -> Option<&FailureEntry> {
        self.entries.get(key)
    }

    /// Number of failed items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing failed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over failed items
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &FailureEntry)> {
        self.entries.iter()
    }
}

impl Serialize for FailureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, entry)| (key.to_string(), entry)))
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, entry)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} ({}): ", entry.label, key)?;
            for (j, reason) in entry.reasons.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", reason)?;
            }
        }
        Ok(())
    }
}
