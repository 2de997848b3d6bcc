//! # Wardrobe Equip
//!
//! Puts a whole item set onto a character in one go.
//!
//! An equip runs as a two-phase transaction: every target slot is freed
//! first, then every item whose slot could be freed goes on. Items that
//! cannot go on are reported per item with the reasons found, and the rest
//! of the set still applies.
//!
//! ```ignore
//! use wardrobe_equip::prelude::*;
//!
//! let mut hooks = NoopHooks;
//! let report = fortune_wheel_equip(
//!     "Lucky Spin",
//!     items,
//!     StripLevel::Clothes,
//!     None,
//!     None,
//!     &mut character,
//!     EquipContext::new(&catalog, &mut hooks),
//! )?;
//! ```

pub mod error;
pub mod failure;
pub mod hooks;
pub mod strip;
pub mod transaction;

pub use error::{EquipError, Result};
pub use failure::{FailureEntry, FailureReason, FailureRecord};
pub use hooks::{apply_craft, apply_type, EquipContext, EquipHooks, NoopHooks, CRAFT_DIFFICULTY_STEP};
pub use strip::{character_strip, strip_filter, validate_character, StripFilter, StripLevel};
pub use transaction::{
    fortune_wheel_equip, EquipReport, EquipTransaction, GlobalCallback, PreRunCallback,
    TransactionState,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{EquipError, Result};
    pub use crate::failure::{FailureReason, FailureRecord};
    pub use crate::hooks::{EquipContext, EquipHooks, NoopHooks};
    pub use crate::strip::{character_strip, StripLevel};
    pub use crate::transaction::{fortune_wheel_equip, EquipReport, EquipTransaction};
}
