//! One account snapshot per session, fetched from the API or served from
//! the cache.

use anyhow::{Context, Result};
use pennywise_core::{AccountSummary, Transaction};
use tracing::info;

use crate::cache::{CacheConfig, SnapshotCache};
use crate::client::ApiClient;
use crate::credentials::Credentials;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub summary: AccountSummary,
    pub transactions: Vec<Transaction>,
}

/// Where fresh snapshots come from
#[allow(async_fn_in_trait)]
pub trait SnapshotFetcher {
    async fn fetch(&self) -> Result<Snapshot>;
}

/// Fetches from the banking API with password-grant credentials
pub struct ApiFetcher {
    client: ApiClient,
    credentials: Credentials,
}

impl ApiFetcher {
    pub fn new(client: ApiClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

impl SnapshotFetcher for ApiFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        let token = self.client.request_access_token(&self.credentials).await?;
        let account_id = &self.credentials.account_id;
        let summary = self.client.fetch_balance(&token, account_id).await?;
        let transactions = self.client.fetch_transactions(&token, account_id).await?;
        Ok(Snapshot {
            summary,
            transactions,
        })
    }
}

/// Load a snapshot. With `use_cache` a populated cache is served as-is and
/// an empty one is filled after fetching; without it the API is always hit
/// and nothing is written.
pub async fn load_snapshot(
    config: &CacheConfig,
    fetcher: &impl SnapshotFetcher,
) -> Result<Snapshot> {
    let cache = SnapshotCache::new(&config.cache_dir);
    if config.use_cache && cache.is_populated() {
        info!(dir = %cache.dir().display(), "loading snapshot from cache");
        return cache.load();
    }

    let snapshot = fetcher.fetch().await.context("fetch account snapshot")?;
    if config.use_cache {
        cache.save(&snapshot)?;
        info!(dir = %cache.dir().display(), "snapshot cached");
    }
    Ok(snapshot)
}
