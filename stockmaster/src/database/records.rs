//! Database record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEventStatus {
    Success,
    Fallback,
    Failed,
    Restore,
}

impl SyncEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncEventStatus::Success => "success",
            SyncEventStatus::Fallback => "fallback",
            SyncEventStatus::Failed => "failed",
            SyncEventStatus::Restore => "restore",
        }
    }
}

/// One row of `sync_log`. `status` stays a string so rows written by other
/// tools still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEvent {
    pub id: i64,
    pub sync_time: Option<DateTime<Utc>>,
    pub status: String,
    pub message: Option<String>,
}
