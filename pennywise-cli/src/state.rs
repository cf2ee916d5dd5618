use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn pennywise_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pennywise"))
}

pub fn ensure_pennywise_home() -> Result<PathBuf> {
    let dir = pennywise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_cache_dir() -> Result<PathBuf> {
    Ok(pennywise_home()?.join("cache"))
}

pub fn default_recurring_path() -> Result<PathBuf> {
    Ok(pennywise_home()?.join("recurring_merchants.json"))
}
