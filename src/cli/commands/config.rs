//! Configuration command.

use std::path::PathBuf;

use crate::config::{self, Config};

/// Show where the config lives and what is in effect
pub fn cmd_config(config: &Config, explicit_path: Option<&PathBuf>, init: bool) -> anyhow::Result<()> {
    let path = match explicit_path {
        Some(path) => Some(path.clone()),
        None => config::config_path(),
    };

    match &path {
        Some(path) if path.exists() => println!("Config file: {:?}", path),
        Some(path) => println!("Config file: {:?} (not created yet, using defaults)", path),
        None => println!("Config file: no config directory on this system"),
    }

    if init {
        match explicit_path {
            Some(path) => config::save_to(config, path)?,
            None => config::save(config)?,
        }
        println!("Wrote effective configuration");
    }

    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
