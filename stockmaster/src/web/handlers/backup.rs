// Backup, sync and restore endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use super::common::{error_response, service_disabled, ApiResponse, ApiResult, ListQuery};
use crate::constants::backup::{DOWNLOAD_PREFIX, TIMESTAMP_FORMAT};
use crate::database::SyncEvent;
use crate::remote::SnapshotRecord;
use crate::services::{BackupRunResult, BackupStatusReport, RestoreReport, SyncOutcome, SyncReport};
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct SyncStatusResponse {
    pub recent_events: Vec<SyncEvent>,
    pub auto_backup: Option<BackupStatusReport>,
}

pub async fn get_backup_status(State(state): State<AppState>) -> ApiResult<BackupStatusReport> {
    let service = state.backup.as_ref().ok_or_else(|| service_disabled("Backup"))?;
    Ok(Json(ApiResponse::success(service.get_status().await)))
}

pub async fn execute_manual_backup(State(state): State<AppState>) -> ApiResult<BackupRunResult> {
    let service = state.backup.as_ref().ok_or_else(|| service_disabled("Backup"))?;

    info!("Manual backup requested");
    let result = service.trigger_manual_backup().await;

    if result.success {
        let message = format!(
            "Backup created: {}",
            result.snapshot_name.as_deref().unwrap_or("-")
        );
        Ok(Json(ApiResponse::success_with_message(result, message)))
    } else {
        let reason = result.error.unwrap_or_else(|| "backup failed".to_string());
        warn!("Manual backup failed: {}", reason);
        Err(error_response(
            StatusCode::BAD_GATEWAY,
            format!("Backup failed: {}", reason),
        ))
    }
}

pub async fn list_backups(
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> ApiResult<Vec<SnapshotRecord>> {
    let service = state.backup.as_ref().ok_or_else(|| service_disabled("Backup"))?;

    match service.list_snapshots(query.limit).await {
        Ok(snapshots) => Ok(Json(ApiResponse::success(snapshots))),
        Err(e) => {
            error!("Failed to list snapshots: {}", e);
            Err(error_response(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

/// Serve a remote snapshot as a file attachment
pub async fn download_backup(
    Path(snapshot_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    let service = state.backup.as_ref().ok_or_else(|| service_disabled("Backup"))?;

    info!("Download requested for snapshot {}", snapshot_id);

    let bytes = service.fetch_snapshot(&snapshot_id).await.map_err(|e| {
        error!("Download of {} failed: {}", snapshot_id, e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let file_name = format!("{}{}.db", DOWNLOAD_PREFIX, Utc::now().format(TIMESTAMP_FORMAT));
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn restore_backup(
    Path(snapshot_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<RestoreReport> {
    if state.backup.is_none() {
        return Err(service_disabled("Backup"));
    }

    info!("Restore requested for snapshot {}", snapshot_id);

    match state.sync.restore_snapshot(&snapshot_id).await {
        Ok(report) => {
            let message = format!("Database restored from {}", snapshot_id);
            Ok(Json(ApiResponse::success_with_message(report, message)))
        }
        Err(e) => {
            error!("Restore of {} failed: {}", snapshot_id, e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}

/// Remote backup with local fallback
pub async fn execute_manual_sync(State(state): State<AppState>) -> ApiResult<SyncReport> {
    info!("Manual sync requested");

    match state.sync.manual_sync().await {
        Ok(report) => {
            if report.outcome == SyncOutcome::Fallback {
                warn!("Manual sync fell back to local copy");
            }
            let message = report.message.clone();
            Ok(Json(ApiResponse::success_with_message(report, message)))
        }
        Err(e) => {
            error!("Manual sync failed: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}

pub async fn get_sync_status(State(state): State<AppState>) -> ApiResult<SyncStatusResponse> {
    let recent_events = state.sync.recent_events().await.map_err(|e| {
        error!("Failed to read sync log: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let auto_backup = match &state.backup {
        Some(service) => Some(service.get_status().await),
        None => None,
    };

    Ok(Json(ApiResponse::success(SyncStatusResponse {
        recent_events,
        auto_backup,
    })))
}
