use anyhow::{Result, bail};
use pennywise_core::{AccountSummary, Merchant, Transaction};
use pennywise_ingest::{CacheConfig, Snapshot, SnapshotCache, SnapshotFetcher, load_snapshot};
use std::cell::Cell;

struct StubFetcher {
    calls: Cell<usize>,
    balance: i64,
}

impl StubFetcher {
    fn new(balance: i64) -> Self {
        Self {
            calls: Cell::new(0),
            balance,
        }
    }
}

impl SnapshotFetcher for StubFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        self.calls.set(self.calls.get() + 1);
        Ok(Snapshot {
            summary: AccountSummary::new(self.balance, -250),
            transactions: vec![Transaction::new(
                "tx_1",
                -250,
                "2026-10-18T07:45:00.000Z",
                Some(Merchant::new("merch_coffee")),
                "",
            )],
        })
    }
}

struct FailingFetcher;

impl SnapshotFetcher for FailingFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        bail!("balance error: 401 Unauthorized")
    }
}

#[tokio::test]
async fn test_cache_disabled_always_fetches_and_never_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        use_cache: false,
        cache_dir: dir.path().join("cache"),
    };
    let fetcher = StubFetcher::new(1000);

    load_snapshot(&config, &fetcher).await.unwrap();
    load_snapshot(&config, &fetcher).await.unwrap();

    assert_eq!(fetcher.calls.get(), 2);
    assert!(!SnapshotCache::new(&config.cache_dir).is_populated());
}

#[tokio::test]
async fn test_cache_enabled_fetches_once_then_serves_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        use_cache: true,
        cache_dir: dir.path().join("cache"),
    };

    let first = load_snapshot(&config, &StubFetcher::new(1000)).await.unwrap();
    assert!(SnapshotCache::new(&config.cache_dir).is_populated());

    // a different balance upstream is not seen while the cache is populated
    let fetcher = StubFetcher::new(9999);
    let second = load_snapshot(&config, &fetcher).await.unwrap();
    assert_eq!(fetcher.calls.get(), 0);
    assert_eq!(second, first);
    assert_eq!(second.summary.balance, 1000);
}

#[tokio::test]
async fn test_fetch_failure_is_reported_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        use_cache: true,
        cache_dir: dir.path().to_path_buf(),
    };
    let err = load_snapshot(&config, &FailingFetcher).await.unwrap_err();
    assert_eq!(err.to_string(), "fetch account snapshot");
    assert!(format!("{err:#}").contains("401 Unauthorized"));
    assert!(!SnapshotCache::new(dir.path()).is_populated());
}
