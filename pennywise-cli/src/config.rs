use anyhow::{Context, Result};
use pennywise_core::MonthLength;
use pennywise_finance::BatchOrder;
use pennywise_ingest::CacheConfig;
use pennywise_ingest::client::{DEFAULT_BASE_URL, DEFAULT_TOKEN_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_cache_dir, default_recurring_path, ensure_pennywise_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub cache: CacheSection,
    pub budget: BudgetSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    pub token_url: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSection {
    pub use_cache: bool,
    /// Defaults to ~/.pennywise/cache
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BudgetSection {
    pub month_length: MonthLength,
    pub batch_order: BatchOrder,
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
    /// Defaults to ~/.pennywise/recurring_merchants.json
    pub recurring_merchants: Option<PathBuf>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for BudgetSection {
    fn default() -> Self {
        Self {
            month_length: MonthLength::default(),
            batch_order: BatchOrder::default(),
            timezone: "Europe/London".to_string(),
            recurring_merchants: None,
        }
    }
}

impl Config {
    pub fn cache_config(&self) -> Result<CacheConfig> {
        let cache_dir = match &self.cache.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir()?,
        };
        Ok(CacheConfig {
            use_cache: self.cache.use_cache,
            cache_dir,
        })
    }

    pub fn recurring_path(&self) -> Result<PathBuf> {
        match &self.budget.recurring_merchants {
            Some(p) => Ok(p.clone()),
            None => default_recurring_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_pennywise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
