// Integration tests for web API handlers, driven through the router

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::fixtures::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use stockmaster::config::Config;
use stockmaster::services::{BackupOrchestrator, NotificationOrchestrator, SyncService};
use stockmaster::web::{create_router, AppState};

struct TestApp {
    db: TestDatabase,
    remote: Arc<FakeRemoteStore>,
    notifier: Arc<RecordingNotifier>,
    router: Router,
}

async fn app(
    backup_enabled: bool,
    notifications_enabled: bool,
    remote: FakeRemoteStore,
    scanner: FakeScanner,
) -> TestApp {
    let db = TestDatabase::new().await.unwrap();
    let config: Config = TestConfigBuilder::new().keep_backups(5).build();
    let remote = Arc::new(remote);
    let notifier = Arc::new(RecordingNotifier::new());

    let notifications = notifications_enabled.then(|| {
        Arc::new(NotificationOrchestrator::new(
            &config,
            Arc::new(scanner),
            notifier.clone(),
        ))
    });
    let backup = backup_enabled.then(|| {
        Arc::new(BackupOrchestrator::new(
            &config,
            remote.clone(),
            db.database.clone(),
            notifications.clone(),
        ))
    });
    let sync = Arc::new(SyncService::new(
        db.database.clone(),
        backup.clone(),
        db.backup_dir(),
    ));

    let router = create_router(AppState::new(Arc::new(config), backup, notifications, sync));

    TestApp {
        db,
        remote,
        notifier,
        router,
    }
}

async fn call(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_status_endpoint_reports_both_services() {
    let app = app(true, true, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "GET", "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["backup"]["is_running"], false);
    assert_eq!(body["data"]["backup"]["last_run_outcome"], "never_run");
    assert_eq!(body["data"]["backup"]["keep_backups"], 5);
    assert_eq!(body["data"]["notifications"]["recipient"], TEST_RECIPIENT);
    assert_eq!(body["data"]["notifications"]["interval_hours"], 24.0);
}

#[tokio::test]
async fn test_disabled_services_are_null_and_unavailable() {
    let app = app(false, false, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "GET", "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["backup"].is_null());
    assert!(body["data"]["notifications"].is_null());

    let (status, body) = call(&app.router, "POST", "/api/backup/manual").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, _) = call(&app.router, "POST", "/api/notifications/check").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_manual_backup_updates_status() {
    let app = app(true, false, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "POST", "/api/backup/manual").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert_eq!(app.remote.upload_calls(), 1);

    let (_, body) = call(&app.router, "GET", "/api/backup/status").await;
    assert_eq!(body["data"]["run_count"], 1);
    assert_eq!(body["data"]["last_run_outcome"], "success");
}

#[tokio::test]
async fn test_manual_backup_failure_is_reported() {
    let remote = FakeRemoteStore::new();
    remote.set_fail_upload(true);
    let app = app(true, false, remote, FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "POST", "/api/backup/manual").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_backup_list_honours_limit() {
    let app = app(
        true,
        false,
        FakeRemoteStore::with_records(seeded_snapshots(8)),
        FakeScanner::empty(),
    )
    .await;

    let (status, body) = call(&app.router, "GET", "/api/backup/list?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["id"], "old-7");

    let (_, body) = call(&app.router, "GET", "/api/backup/list").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_notification_check_endpoint() {
    let scanner = FakeScanner::new(
        vec![low_stock_item(1, 0, 2), low_stock_item(2, 1, 2)],
        vec![],
    );
    let app = app(false, true, FakeRemoteStore::new(), scanner).await;

    let (status, body) = call(&app.router, "POST", "/api/notifications/check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notifications_sent"], 1);
    assert_eq!(body["data"]["low_stock_items"], 2);
    assert_eq!(app.notifier.sent_count(), 1);

    let (_, body) = call(&app.router, "GET", "/api/notifications/status").await;
    assert_eq!(body["data"]["run_count"], 1);
}

#[tokio::test]
async fn test_sync_endpoints_log_fallback() {
    let remote = FakeRemoteStore::new();
    remote.set_fail_upload(true);
    let app = app(true, false, remote, FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "POST", "/api/sync/manual").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "fallback");
    assert!(app.db.backup_dir().exists());

    let (status, body) = call(&app.router, "GET", "/api/sync/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recent_events"][0]["status"], "fallback");
    assert_eq!(body["data"]["auto_backup"]["last_run_outcome"], "failure");
}

#[tokio::test]
async fn test_restore_of_unknown_snapshot_fails() {
    let app = app(true, false, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "POST", "/api/backup/restore/nope").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_download_serves_snapshot_as_attachment() {
    let app = app(true, false, FakeRemoteStore::new(), FakeScanner::empty()).await;
    app.remote.put_content("snap-1", b"SQLite format 3\0payload".to_vec());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/backup/download/snap-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"stockmaster_backup_"));
    assert!(disposition.ends_with(".db\""));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"SQLite format 3\0payload");
}

#[tokio::test]
async fn test_download_of_unknown_snapshot_fails() {
    let app = app(true, false, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, body) = call(&app.router, "GET", "/api/backup/download/missing").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_download_with_backup_disabled_is_unavailable() {
    let app = app(false, false, FakeRemoteStore::new(), FakeScanner::empty()).await;

    let (status, _) = call(&app.router, "GET", "/api/backup/download/snap-1").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
