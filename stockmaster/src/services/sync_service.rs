//! Manual sync and restore.
//!
//! A manual sync runs a backup right away and, when the remote store is not
//! reachable, keeps a local copy of the database instead. Every outcome is
//! written to `sync_log`.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::backup_service::BackupOrchestrator;
use crate::constants::backup::{PRE_RESTORE_PREFIX, SNAPSHOT_PREFIX, TIMESTAMP_FORMAT};
use crate::constants::defaults::SYNC_LOG_ENTRIES;
use crate::database::{Database, SyncEvent, SyncEventStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Success,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub message: String,
    pub snapshot_name: Option<String>,
    pub link: Option<String>,
    pub local_copy: Option<String>,
    pub remote_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub snapshot_id: String,
    pub backup_before_restore: String,
}

pub struct SyncService {
    database: Arc<Database>,
    backup: Option<Arc<BackupOrchestrator>>,
    local_backup_dir: PathBuf,
}

impl SyncService {
    pub fn new(
        database: Arc<Database>,
        backup: Option<Arc<BackupOrchestrator>>,
        local_backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            database,
            backup,
            local_backup_dir: local_backup_dir.into(),
        }
    }

    /// Push a backup to the remote store, falling back to a local copy.
    pub async fn manual_sync(&self) -> Result<SyncReport> {
        let remote_error = match &self.backup {
            Some(backup) => {
                let result = backup.trigger_manual_backup().await;
                if result.success {
                    let name = result.snapshot_name.clone().unwrap_or_default();
                    let message = format!("Backup uploaded: {}", name);
                    self.log_event(SyncEventStatus::Success, &message).await;

                    return Ok(SyncReport {
                        outcome: SyncOutcome::Success,
                        message,
                        snapshot_name: result.snapshot_name,
                        link: result.link,
                        local_copy: None,
                        remote_error: None,
                    });
                }
                result.error.unwrap_or_else(|| "backup failed".to_string())
            }
            None => "remote backup is disabled".to_string(),
        };

        warn!("Remote sync unavailable ({}), creating local backup", remote_error);

        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let local_copy = self
            .copy_database(&format!("{}{}.db", SNAPSHOT_PREFIX, stamp))
            .await
            .map_err(|e| {
                error!("Local fallback backup failed: {}", e);
                e
            })?;

        let local_copy = local_copy.to_string_lossy().to_string();
        let message = format!("Local backup created: {}", local_copy);
        self.log_event(SyncEventStatus::Fallback, &message).await;

        Ok(SyncReport {
            outcome: SyncOutcome::Fallback,
            message,
            snapshot_name: None,
            link: None,
            local_copy: Some(local_copy),
            remote_error: Some(remote_error),
        })
    }

    /// Replace the live database with a remote snapshot.
    ///
    /// The current file is copied aside first; the snapshot is downloaded next
    /// to the database and renamed over it so the swap is atomic.
    pub async fn restore_snapshot(&self, snapshot_id: &str) -> Result<RestoreReport> {
        let backup = self
            .backup
            .as_ref()
            .ok_or_else(|| anyhow!("remote backup is disabled"))?;

        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let safety_copy = self
            .copy_database(&format!("{}{}.db", PRE_RESTORE_PREFIX, stamp))
            .await?;
        info!("Current database saved to {}", safety_copy.display());

        let db_path = self.database.path().to_path_buf();
        let temp_path = temp_restore_path(&db_path);

        if let Err(e) = backup.download_snapshot(snapshot_id, &temp_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            self.log_event(
                SyncEventStatus::Failed,
                &format!("Restore of {} failed: {}", snapshot_id, e),
            )
            .await;
            return Err(anyhow!("download of snapshot {} failed: {}", snapshot_id, e));
        }

        self.database.close().await;
        let swap = tokio::fs::rename(&temp_path, &db_path).await;
        // Reopen whether or not the swap happened
        self.database.reconnect().await?;
        swap.with_context(|| format!("failed to move restored snapshot over {}", db_path.display()))?;

        let backup_before_restore = safety_copy.to_string_lossy().to_string();
        self.log_event(
            SyncEventStatus::Restore,
            &format!(
                "Restored snapshot {} (previous database: {})",
                snapshot_id, backup_before_restore
            ),
        )
        .await;

        info!("Database restored from snapshot {}", snapshot_id);
        Ok(RestoreReport {
            snapshot_id: snapshot_id.to_string(),
            backup_before_restore,
        })
    }

    pub async fn recent_events(&self) -> Result<Vec<SyncEvent>> {
        self.database.recent_sync_events(SYNC_LOG_ENTRIES).await
    }

    async fn copy_database(&self, file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.local_backup_dir)
            .await
            .with_context(|| format!("failed to create {}", self.local_backup_dir.display()))?;

        let target = self.local_backup_dir.join(file_name);
        tokio::fs::copy(self.database.path(), &target)
            .await
            .with_context(|| format!("failed to copy database to {}", target.display()))?;

        Ok(target)
    }

    async fn log_event(&self, status: SyncEventStatus, message: &str) {
        if let Err(e) = self.database.record_sync_event(status, message).await {
            warn!("Failed to record sync event: {}", e);
        }
    }
}

fn temp_restore_path(db_path: &Path) -> PathBuf {
    let file_name = db_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "inventory.db".to_string());
    db_path.with_file_name(format!(".{}.restore", file_name))
}
