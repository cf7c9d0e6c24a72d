use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stockmaster::scheduler::StartOutcome;
use stockmaster::web::{start_web_server, AppState};
use stockmaster::{
    BackupOrchestrator, ConfigManager, Database, HttpRemoteStore, NotificationOrchestrator,
    SyncService, WebhookNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("stockmaster=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting StockMaster background services");

    let config_dir = std::env::var("STOCKMASTER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config_manager = Arc::new(ConfigManager::new(config_dir).await?);
    let config = config_manager.get_current_config();

    let database = Arc::new(Database::new(&config.database_path).await?);
    info!("Database initialized");

    let notifications = if config.notifications.enabled {
        let notifier = Arc::new(WebhookNotifier::new(
            config.notifications.webhook_url.clone(),
        ));
        if !notifier.is_configured() {
            warn!("notifications.webhook_url is empty - alerts will not be delivered");
        }
        let service = Arc::new(NotificationOrchestrator::new(
            &config,
            database.clone(),
            notifier,
        ));
        info!("Notification service initialized");
        Some(service)
    } else {
        info!("Notification service disabled");
        None
    };

    let backup = if config.backup.enabled {
        let remote = Arc::new(HttpRemoteStore::new(&config.remote)?);
        let service = Arc::new(BackupOrchestrator::new(
            &config,
            remote,
            database.clone(),
            notifications.clone(),
        ));
        info!("Backup service initialized");
        Some(service)
    } else {
        info!("Backup service disabled");
        None
    };

    let sync_service = Arc::new(SyncService::new(
        database.clone(),
        backup.clone(),
        config.local_backup_dir.clone(),
    ));

    // First runs can take a while; keep them off the startup path
    if let Some(service) = backup.clone() {
        tokio::spawn(async move {
            if let StartOutcome::Refused(reason) = service.start().await {
                error!("Backup service refused to start: {}", reason);
            }
        });
    }
    if let Some(service) = notifications.clone() {
        tokio::spawn(async move {
            if let StartOutcome::Refused(reason) = service.start().await {
                error!("Notification service refused to start: {}", reason);
            }
        });
    }

    let state = AppState::new(
        config.clone(),
        backup.clone(),
        notifications.clone(),
        sync_service,
    );

    if let Err(e) = start_web_server(state, shutdown_signal()).await {
        error!("Web server error: {}", e);
    }

    info!("Shutting down background services...");
    if let Some(service) = &backup {
        service.stop().await;
    }
    if let Some(service) = &notifications {
        service.stop().await;
    }
    database.close().await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
