// Common types and utilities for API handlers

use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::backup::LIST_LIMIT;

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::success(data)
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse<()>>) {
    (status, Json(ApiResponse::error(message)))
}

pub fn service_disabled(service: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("{} service is disabled", service),
    )
}

// Query parameters
#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize {
    LIST_LIMIT
}
