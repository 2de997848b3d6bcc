//! Error types for equip transactions

use thiserror::Error;

/// Equip errors.
///
/// Per-item problems are never errors; they land in the failure record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    /// Only the player and simple characters can be changed
    #[error("Character '{0}' is neither the player nor a simple character")]
    InvalidCharacter(String),

    /// Numeric strip level outside the known range
    #[error("Invalid strip level: {0}")]
    InvalidStripLevel(u8),

    /// Strip level name that does not parse
    #[error("Unknown strip level: {0}")]
    UnknownStripLevel(String),
}

/// Result type for equip operations
pub type Result<T> = std::result::Result<T, EquipError>;
