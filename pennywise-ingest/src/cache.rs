//! On-disk snapshot cache: `balance` and `transactions` JSON files in one
//! directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{decode_summary, decode_transactions};
use crate::snapshot::Snapshot;

const BALANCE_FILE: &str = "balance";
const TRANSACTIONS_FILE: &str = "transactions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Serve from the cache when it is populated; populate it after a fetch
    pub use_cache: bool,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn balance_path(&self) -> PathBuf {
        self.dir.join(BALANCE_FILE)
    }

    fn transactions_path(&self) -> PathBuf {
        self.dir.join(TRANSACTIONS_FILE)
    }

    pub fn is_populated(&self) -> bool {
        self.balance_path().exists() && self.transactions_path().exists()
    }

    pub fn load(&self) -> Result<Snapshot> {
        let p = self.balance_path();
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        let summary = decode_summary(&s).with_context(|| format!("parse {}", p.display()))?;

        let p = self.transactions_path();
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        let values: Vec<Value> =
            serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
        let transactions = decode_transactions(values)?;

        Ok(Snapshot {
            summary,
            transactions,
        })
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("create {}", self.dir.display()))?;
        write_json(&self.balance_path(), &snapshot.summary)?;
        write_json(&self.transactions_path(), &snapshot.transactions)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        for p in [self.balance_path(), self.transactions_path()] {
            if p.exists() {
                fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
            }
        }
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
