//! Run configuration
//!
//! Loaded from a TOML file, then overridden from the environment:
//! - `WARDROBE_STRIP`: strip level name or number
//! - `WARDROBE_SORT`: `1`/`true` to sort the item set first

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wardrobe_equip::StripLevel;

/// Files tried when no path is given
pub const DEFAULT_PATHS: &[&str] = &["wardrobe.toml", "demos/wardrobe.toml"];

/// Errors from loading configuration and input files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a file, keeping its path in the error
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// One equip run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Transaction display name
    pub name: String,
    /// What to take off first
    pub strip: StripLevel,
    /// Sort the item set by equip priority before equipping
    pub sort: bool,
    /// Asset catalog (JSON)
    pub catalog: PathBuf,
    /// Character to dress (JSON)
    pub character: PathBuf,
    /// Item set to equip (JSON)
    pub outfit: PathBuf,
    /// Where this config came from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: "Wheel of Fortune".to_string(),
            strip: StripLevel::None,
            sort: true,
            catalog: PathBuf::from("catalog.json"),
            character: PathBuf::from("character.json"),
            outfit: PathBuf::from("outfit.json"),
            config_path: None,
        }
    }
}

impl RunConfig {
    /// Parse from TOML; relative input paths stay as written
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file, resolving input paths against its directory
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_toml(&read_file(path)?)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load from `path`, or the first default file that exists, then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match DEFAULT_PATHS.iter().map(Path::new).find(|p| p.exists()) {
                Some(path) => Self::load_from_file(path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(strip) = lookup("WARDROBE_STRIP") {
            match strip.parse() {
                Ok(level) => {
                    self.strip = level;
                    log::info!("Strip level from env: {}", self.strip);
                }
                Err(e) => log::warn!("Ignoring WARDROBE_STRIP: {}", e),
            }
        }

        if let Some(sort) = lookup("WARDROBE_SORT") {
            self.sort = sort == "1" || sort == "true";
        }
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for path in [&mut self.catalog, &mut self.character, &mut self.outfit] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Log a configuration summary
    pub fn print_summary(&self) {
        log::info!("Run Configuration:");
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
        log::info!("  Name: {}", self.name);
        log::info!("  Strip: {}, Sort: {}", self.strip, self.sort);
        log::info!("  Catalog: {}", self.catalog.display());
        log::info!("  Character: {}", self.character.display());
        log::info!("  Outfit: {}", self.outfit.display());
    }
}
