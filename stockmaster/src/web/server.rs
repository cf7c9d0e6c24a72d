use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::get_status))
        // === BACKUP ROUTES ===
        .route("/api/backup/status", get(handlers::get_backup_status))
        .route("/api/backup/manual", post(handlers::execute_manual_backup))
        .route("/api/backup/list", get(handlers::list_backups))
        .route(
            "/api/backup/download/{snapshot_id}",
            get(handlers::download_backup),
        )
        .route(
            "/api/backup/restore/{snapshot_id}",
            post(handlers::restore_backup),
        )
        // === SYNC ROUTES ===
        .route("/api/sync/manual", post(handlers::execute_manual_sync))
        .route("/api/sync/status", get(handlers::get_sync_status))
        // === NOTIFICATION ROUTES ===
        .route(
            "/api/notifications/status",
            get(handlers::get_notification_status),
        )
        .route(
            "/api/notifications/check",
            post(handlers::execute_notification_check),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
