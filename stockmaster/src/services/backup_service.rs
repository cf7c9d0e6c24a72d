//! Periodic remote backup of the inventory database
//!
//! Each run uploads the live SQLite file under a timestamped name and prunes
//! the remote folder down to `keep_backups` snapshots. The remote session
//! (authentication plus destination folder) is established lazily, cached
//! between runs, and dropped after a failed upload so the next run starts
//! from a fresh login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::notification_service::NotificationOrchestrator;
use crate::config::Config;
use crate::constants::backup::{RETENTION_LIST_LIMIT, SNAPSHOT_PREFIX, TIMESTAMP_FORMAT};
use crate::errors::{JobError, RemoteError};
use crate::inventory::SnapshotSource;
use crate::remote::{RemoteSyncPort, SnapshotRecord};
use crate::retention::RetentionPolicy;
use crate::scheduler::{Job, ServiceRunner, ServiceStatus, StartOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct BackupRunResult {
    pub success: bool,
    pub snapshot_name: Option<String>,
    pub link: Option<String>,
    pub error: Option<String>,
    pub pruned: usize,
    pub finished_at: DateTime<Utc>,
}

impl BackupRunResult {
    fn succeeded(record: &SnapshotRecord, pruned: usize) -> Self {
        Self {
            success: true,
            snapshot_name: Some(record.display_name.clone()),
            link: record.link.clone(),
            error: None,
            pruned,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            snapshot_name: None,
            link: None,
            error: Some(error),
            pruned: 0,
            finished_at: Utc::now(),
        }
    }
}

/// Produces `inventory_backup_YYYYmmdd_HHMMSS.db`, adding a counter when two
/// names would share a second.
pub struct SnapshotNamer {
    last: std::sync::Mutex<(String, u32)>,
}

impl SnapshotNamer {
    pub fn new() -> Self {
        Self {
            last: std::sync::Mutex::new((String::new(), 0)),
        }
    }

    pub fn next_name(&self, now: DateTime<Utc>) -> String {
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if last.0 == stamp {
            last.1 += 1;
            format!("{}{}_{}.db", SNAPSHOT_PREFIX, stamp, last.1)
        } else {
            *last = (stamp.clone(), 0);
            format!("{}{}.db", SNAPSHOT_PREFIX, stamp)
        }
    }
}

impl Default for SnapshotNamer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BackupJob {
    remote: Arc<dyn RemoteSyncPort>,
    source: Arc<dyn SnapshotSource>,
    keep_backups: usize,
    // Destination id of an authenticated session
    session: Mutex<Option<String>>,
    namer: SnapshotNamer,
    last_snapshot_name: RwLock<Option<String>>,
    completion_notifier: Option<Arc<NotificationOrchestrator>>,
}

impl BackupJob {
    pub fn new(
        remote: Arc<dyn RemoteSyncPort>,
        source: Arc<dyn SnapshotSource>,
        keep_backups: usize,
        completion_notifier: Option<Arc<NotificationOrchestrator>>,
    ) -> Self {
        Self {
            remote,
            source,
            keep_backups,
            session: Mutex::new(None),
            namer: SnapshotNamer::new(),
            last_snapshot_name: RwLock::new(None),
            completion_notifier,
        }
    }

    async fn ensure_session(&self) -> Result<String, RemoteError> {
        let mut session = self.session.lock().await;
        if let Some(destination) = session.as_ref() {
            return Ok(destination.clone());
        }

        self.remote.authenticate().await?;
        let destination = self.remote.ensure_destination().await?;
        debug!("Remote session established, destination {}", destination);
        *session = Some(destination.clone());
        Ok(destination)
    }

    async fn drop_session(&self) {
        self.session.lock().await.take();
    }

    #[instrument(skip(self))]
    pub async fn perform_backup(&self) -> BackupRunResult {
        let display_name = self.namer.next_name(Utc::now());
        let local_path = self.source.current_path();
        info!("Starting backup {}", display_name);

        let destination = match self.ensure_session().await {
            Ok(destination) => destination,
            Err(e) => {
                warn!("Backup {} aborted, remote session unavailable: {}", display_name, e);
                return BackupRunResult::failed(e.to_string());
            }
        };

        let record = match self
            .remote
            .upload(&destination, &local_path, &display_name)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                warn!("Upload of {} failed: {}", display_name, e);
                self.drop_session().await;
                return BackupRunResult::failed(e.to_string());
            }
        };

        *self.last_snapshot_name.write().await = Some(record.display_name.clone());
        let pruned = self.apply_retention(&destination, &record).await;

        info!(
            "Backup {} uploaded ({} old snapshot{} pruned)",
            record.display_name,
            pruned,
            if pruned == 1 { "" } else { "s" }
        );
        BackupRunResult::succeeded(&record, pruned)
    }

    /// Delete snapshots beyond `keep_backups`, not counting the one just
    /// uploaded. Returns how many were actually deleted.
    async fn apply_retention(&self, destination: &str, uploaded: &SnapshotRecord) -> usize {
        let existing = match self.remote.list(destination, RETENTION_LIST_LIMIT).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Could not list snapshots for retention: {}", e);
                return 0;
            }
        };

        let candidates: Vec<SnapshotRecord> = existing
            .into_iter()
            .filter(|r| r.id != uploaded.id)
            .collect();

        let decision = RetentionPolicy::decide(&candidates, self.keep_backups);
        if decision.delete.is_empty() {
            debug!(
                "Retention: {} snapshots within limit of {}",
                decision.keep.len(),
                self.keep_backups
            );
            return 0;
        }

        let mut deleted = 0;
        for record in &decision.delete {
            match self.remote.delete(&record.id).await {
                Ok(()) => {
                    info!("Deleted old snapshot: {}", record.display_name);
                    deleted += 1;
                }
                Err(e) => {
                    warn!("Failed to delete old snapshot {}: {}", record.display_name, e);
                }
            }
        }
        deleted
    }

    pub async fn last_snapshot_name(&self) -> Option<String> {
        self.last_snapshot_name.read().await.clone()
    }

    pub async fn list_snapshots(&self, limit: usize) -> Result<Vec<SnapshotRecord>, RemoteError> {
        let destination = self.ensure_session().await?;
        self.remote.list(&destination, limit).await
    }

    pub async fn download_snapshot(&self, id: &str, destination_path: &Path) -> Result<(), RemoteError> {
        self.ensure_session().await?;
        self.remote.download(id, destination_path).await
    }
}

#[async_trait]
impl Job for BackupJob {
    type Output = BackupRunResult;

    fn name(&self) -> &'static str {
        "backup"
    }

    async fn prepare(&self) -> Result<(), JobError> {
        self.ensure_session().await?;
        Ok(())
    }

    async fn run(&self) -> Result<BackupRunResult, JobError> {
        let result = self.perform_backup().await;

        if let Some(notifier) = &self.completion_notifier {
            notifier
                .notify_backup_status(
                    result.success,
                    result.snapshot_name.as_deref(),
                    result.error.as_deref(),
                )
                .await;
        }

        Ok(result)
    }

    fn failure(&self, output: &BackupRunResult) -> Option<String> {
        if output.success {
            None
        } else {
            Some(
                output
                    .error
                    .clone()
                    .unwrap_or_else(|| "backup failed".to_string()),
            )
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupStatusReport {
    #[serde(flatten)]
    pub service: ServiceStatus,
    pub keep_backups: usize,
    pub last_snapshot_name: Option<String>,
}

pub struct BackupOrchestrator {
    runner: ServiceRunner<BackupJob>,
}

impl BackupOrchestrator {
    pub fn new(
        config: &Config,
        remote: Arc<dyn RemoteSyncPort>,
        source: Arc<dyn SnapshotSource>,
        notifier: Option<Arc<NotificationOrchestrator>>,
    ) -> Self {
        let completion_notifier = if config.backup.notify_on_completion {
            notifier
        } else {
            None
        };

        let job = BackupJob::new(
            remote,
            source,
            config.backup.keep_backups,
            completion_notifier,
        );

        Self {
            runner: ServiceRunner::new(
                Arc::new(job),
                config.backup_interval(),
                config.poll_interval(),
                config.stop_grace(),
            ),
        }
    }

    pub async fn start(&self) -> StartOutcome {
        self.runner.start().await
    }

    pub async fn stop(&self) {
        self.runner.stop().await
    }

    /// Run a backup immediately and return its result.
    pub async fn trigger_manual_backup(&self) -> BackupRunResult {
        match self.runner.trigger_now().await {
            Ok(result) => result,
            Err(e) => BackupRunResult::failed(e.to_string()),
        }
    }

    pub async fn get_status(&self) -> BackupStatusReport {
        BackupStatusReport {
            service: self.runner.status().await,
            keep_backups: self.runner.job().keep_backups,
            last_snapshot_name: self.runner.job().last_snapshot_name().await,
        }
    }

    pub async fn list_snapshots(&self, limit: usize) -> Result<Vec<SnapshotRecord>, RemoteError> {
        self.runner.job().list_snapshots(limit).await
    }

    pub async fn download_snapshot(&self, id: &str, destination_path: &Path) -> Result<(), RemoteError> {
        self.runner.job().download_snapshot(id, destination_path).await
    }

    /// Snapshot contents, staged through a scratch file in the temp directory.
    pub async fn fetch_snapshot(&self, id: &str) -> Result<Vec<u8>, RemoteError> {
        let scratch = std::env::temp_dir().join(format!("stockmaster_download_{}.db", Uuid::new_v4()));

        let result = match self.download_snapshot(id, &scratch).await {
            Ok(()) => tokio::fs::read(&scratch).await.map_err(RemoteError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_file(&scratch).await {
            debug!("Scratch file {} not removed: {}", scratch.display(), e);
        }
        result
    }
}
