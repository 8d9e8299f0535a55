//! `amalgam config` — Configuration management commands.

use amalgam_config::AmalgamConfig;
use std::path::{Path, PathBuf};

fn resolve(config_path: Option<&Path>) -> PathBuf {
    config_path.map_or_else(AmalgamConfig::default_path, Path::to_path_buf)
}

pub fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AmalgamConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", resolve(config_path).display());
    Ok(())
}

pub fn init(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve(config_path);

    if path.exists() && !force {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or re-run with --force.");
        return Ok(());
    }

    std::fs::write(&path, AmalgamConfig::default_toml())?;
    println!("✅ Created {}", path.display());
    Ok(())
}
