pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::services::{BackupOrchestrator, NotificationOrchestrator, StatusRegistry, SyncService};

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    // None when the service is disabled in configuration
    pub backup: Option<Arc<BackupOrchestrator>>,
    pub notifications: Option<Arc<NotificationOrchestrator>>,
    pub sync: Arc<SyncService>,
    pub status: StatusRegistry,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        backup: Option<Arc<BackupOrchestrator>>,
        notifications: Option<Arc<NotificationOrchestrator>>,
        sync: Arc<SyncService>,
    ) -> Self {
        let status = StatusRegistry::new(backup.clone(), notifications.clone());
        Self {
            config,
            backup,
            notifications,
            sync,
            status,
        }
    }
}
