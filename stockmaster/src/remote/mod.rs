//! Remote snapshot storage.
//!
//! `RemoteSyncPort` is the seam between the backup orchestrator and whatever
//! object store holds the snapshots. `HttpRemoteStore` is the bundled adapter.

pub mod http_store;

pub use http_store::HttpRemoteStore;

use crate::errors::RemoteError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One remote snapshot. Never mutated after the store hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub size: Option<u64>,
    pub link: Option<String>,
}

#[async_trait]
pub trait RemoteSyncPort: Send + Sync {
    /// Verify credentials with the store.
    async fn authenticate(&self) -> Result<(), RemoteError>;

    /// Find or create the snapshot folder and return its identifier.
    async fn ensure_destination(&self) -> Result<String, RemoteError>;

    async fn upload(
        &self,
        destination: &str,
        local_path: &Path,
        display_name: &str,
    ) -> Result<SnapshotRecord, RemoteError>;

    /// Snapshots in the destination, newest first.
    async fn list(&self, destination: &str, limit: usize) -> Result<Vec<SnapshotRecord>, RemoteError>;

    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    async fn download(&self, id: &str, destination_path: &Path) -> Result<(), RemoteError>;
}
