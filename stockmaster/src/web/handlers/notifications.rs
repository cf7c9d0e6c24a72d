use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use super::common::{error_response, service_disabled, ApiResponse, ApiResult};
use crate::services::{NotificationReport, NotificationStatusReport};
use crate::web::AppState;

pub async fn get_notification_status(
    State(state): State<AppState>,
) -> ApiResult<NotificationStatusReport> {
    let service = state
        .notifications
        .as_ref()
        .ok_or_else(|| service_disabled("Notification"))?;

    Ok(Json(ApiResponse::success(service.get_status().await)))
}

/// Run the low stock and maintenance check now
pub async fn execute_notification_check(
    State(state): State<AppState>,
) -> ApiResult<NotificationReport> {
    let service = state
        .notifications
        .as_ref()
        .ok_or_else(|| service_disabled("Notification"))?;

    info!("Manual notification check requested");

    match service.trigger_manual_notification_check().await {
        Ok(report) => {
            let message = format!("{} notification(s) sent", report.notifications_sent);
            Ok(Json(ApiResponse::success_with_message(report, message)))
        }
        Err(e) if e.is_config() => Err(error_response(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("Manual notification check failed: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}
