//! Profile management commands: create, list, delete, use.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Profile};

pub fn create(config_path: &Path, profile: Profile) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    let name = profile.name.clone();
    let existed = config.get(&name).is_some();
    config.upsert_profile(profile);
    config.save(config_path)?;
    if existed {
        println!("Profile '{name}' updated.");
    } else {
        println!("Profile '{name}' created.");
    }
    if config.current_profile == name {
        println!("Current profile: {name}");
    }
    Ok(())
}

pub fn list(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    if config.profiles.is_empty() {
        println!("No profiles. Create one with: catpaw profile create <name> --api <url>");
        return Ok(());
    }
    for p in &config.profiles {
        let marker = if p.name == config.current_profile { "*" } else { " " };
        println!("{marker} {:<12} {}", p.name, p.api_url);
    }
    Ok(())
}

pub fn delete(config_path: &Path, name: &str) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if !config.remove_profile(name) {
        anyhow::bail!("Profile '{name}' not found");
    }
    config.save(config_path)?;
    println!("Profile '{name}' deleted.");
    Ok(())
}

pub fn use_profile(config_path: &Path, name: &str) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if config.get(name).is_none() {
        anyhow::bail!("Profile '{name}' not found");
    }
    config.current_profile = name.to_string();
    config.save(config_path)?;
    println!("Switched to profile '{name}'.");
    Ok(())
}
