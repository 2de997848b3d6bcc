//! Wardrobe runner
//!
//! Loads a run config, a catalog, a character and an item set, then sorts
//! and equips the set and prints the report and the resulting character as
//! JSON.
//!
//! Run with: cargo run -p wardrobe_runtime -- [config.toml]
//! Set `WARDROBE_DEBUG` for debug logging.

mod app;
mod config;

use app::{LogHooks, RunError, RunOutput};
use config::RunConfig;
use std::path::PathBuf;

fn main() {
    let filter = if std::env::var_os("WARDROBE_DEBUG").is_some() {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = match RunConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    config.print_summary();

    if let Err(e) = execute(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn execute(config: &RunConfig) -> Result<(), RunError> {
    let mut inputs = app::load_inputs(config)?;
    let mut hooks = LogHooks::default();
    let report = app::run(config, &mut inputs, &mut hooks)?;
    log::debug!("{} refresh(es), {} update(s)", hooks.refreshes, hooks.updates);

    let output = RunOutput {
        report,
        character: inputs.character.to_record(),
        dropped: inputs.dropped,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
