//! Loading run inputs and driving one equip

use crate::config::{read_file, ConfigError, RunConfig};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use wardrobe_equip::{fortune_wheel_equip, EquipContext, EquipError, EquipHooks, EquipReport};
use wardrobe_graph::{fortune_items_sort, GraphError};
use wardrobe_inventory::{Catalog, CatalogError, Character, CharacterRecord, ItemDescriptor, WornRecord};

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Ordering error: {0}")]
    Graph(#[from] GraphError),

    #[error("Equip error: {0}")]
    Equip(#[from] EquipError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Everything a run reads from disk
#[derive(Debug)]
pub struct RunInputs {
    pub catalog: Catalog,
    pub character: Character,
    pub outfit: Vec<ItemDescriptor>,
    /// Worn items the catalog could not resolve
    pub dropped: Vec<WornRecord>,
}

/// What a run prints
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub report: EquipReport,
    pub character: CharacterRecord,
    pub dropped: Vec<WornRecord>,
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read catalog, character and item set
pub fn load_inputs(config: &RunConfig) -> Result<RunInputs, RunError> {
    let mut catalog = Catalog::new();
    catalog.load_file(&config.catalog)?;
    log::info!(
        "Loaded {} asset(s) from {}",
        catalog.asset_count(),
        config.catalog.display()
    );

    let record: CharacterRecord = parse_json(&config.character)?;
    let (character, dropped) = Character::from_record(record, &catalog);
    if !dropped.is_empty() {
        log::warn!("{} worn item(s) not in the catalog were dropped", dropped.len());
    }

    let outfit: Vec<ItemDescriptor> = parse_json(&config.outfit)?;
    log::info!("Loaded {} item(s) from {}", outfit.len(), config.outfit.display());

    Ok(RunInputs {
        catalog,
        character,
        outfit,
        dropped,
    })
}

/// Hooks that log redraws and updates instead of performing them
#[derive(Debug, Default)]
pub struct LogHooks {
    pub refreshes: usize,
    pub updates: usize,
}

impl EquipHooks for LogHooks {
    fn refresh(&mut self, character: &Character, push: bool) {
        self.refreshes += 1;
        log::info!(
            "Refreshing {} ({} item(s){})",
            character.name,
            character.appearance.len(),
            if push { ", pushed" } else { "" }
        );
    }

    fn notify_update(&mut self, character: &Character) {
        self.updates += 1;
        log::info!("Appearance of {} updated", character.name);
    }
}

/// Sort if configured, then equip
pub fn run(config: &RunConfig, inputs: &mut RunInputs, hooks: &mut dyn EquipHooks) -> Result<EquipReport, RunError> {
    let RunInputs {
        catalog,
        character,
        outfit,
        ..
    } = inputs;

    let mut items = std::mem::take(outfit);
    if config.sort {
        fortune_items_sort(&mut items, &*character, &*catalog)?;
        log::debug!(
            "Equip order: {:?}",
            items.iter().map(|item| item.key().to_string()).collect::<Vec<_>>()
        );
    }

    let report = fortune_wheel_equip(
        &config.name,
        items,
        config.strip,
        None,
        None,
        character,
        EquipContext::new(&*catalog, hooks),
    )?;

    log::info!(
        "{}: {} stripped, {} cleared, {} equipped, {} failed",
        report.name,
        report.stripped.len(),
        report.cleared.len(),
        report.equipped.len(),
        report.failures.len()
    );
    Ok(report)
}
