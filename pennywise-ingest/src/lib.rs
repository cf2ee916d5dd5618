//! pennywise-ingest: banking API client, credentials, and the snapshot cache.

pub mod cache;
pub mod client;
pub mod credentials;
pub mod snapshot;

pub use cache::{CacheConfig, SnapshotCache};
pub use client::ApiClient;
pub use credentials::Credentials;
pub use snapshot::{ApiFetcher, Snapshot, SnapshotFetcher, load_snapshot};
