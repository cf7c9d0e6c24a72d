use axum::{extract::State, response::Json};

use super::common::{ApiResponse, ApiResult};
use crate::services::StatusReport;
use crate::web::AppState;

/// Combined status of both background services
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusReport> {
    Ok(Json(ApiResponse::success(state.status.report().await)))
}
