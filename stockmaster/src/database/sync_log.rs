//! Sync event history.

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use sqlx::Row;
use tracing::debug;

use super::records::{SyncEvent, SyncEventStatus};
use super::Database;

// Same shape SQLite's CURRENT_TIMESTAMP produces
const SYNC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Database {
    pub async fn record_sync_event(&self, status: SyncEventStatus, message: &str) -> Result<()> {
        debug!("Recording sync event: {} - {}", status.as_str(), message);

        sqlx::query("INSERT INTO sync_log (sync_time, status, message) VALUES (?, ?, ?)")
            .bind(Utc::now().format(SYNC_TIME_FORMAT).to_string())
            .bind(status.as_str())
            .bind(message)
            .execute(&self.pool())
            .await?;

        Ok(())
    }

    pub async fn recent_sync_events(&self, limit: i64) -> Result<Vec<SyncEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sync_time, status, message
            FROM sync_log
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool())
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let sync_time: Option<String> = row.try_get("sync_time")?;
            events.push(SyncEvent {
                id: row.try_get("id")?,
                sync_time: sync_time.as_deref().and_then(|s| {
                    NaiveDateTime::parse_from_str(s.get(..19).unwrap_or(s), SYNC_TIME_FORMAT)
                        .ok()
                        .map(|t| t.and_utc())
                }),
                status: row.try_get::<Option<String>, _>("status")?.unwrap_or_default(),
                message: row.try_get("message")?,
            });
        }

        Ok(events)
    }
}
