use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::backup_service::{BackupOrchestrator, BackupStatusReport};
use super::notification_service::{NotificationOrchestrator, NotificationStatusReport};

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub backup: Option<BackupStatusReport>,
    pub notifications: Option<NotificationStatusReport>,
    pub generated_at: DateTime<Utc>,
}

/// Read-only view over both services. A disabled service reports `null`.
#[derive(Clone)]
pub struct StatusRegistry {
    backup: Option<Arc<BackupOrchestrator>>,
    notifications: Option<Arc<NotificationOrchestrator>>,
}

impl StatusRegistry {
    pub fn new(
        backup: Option<Arc<BackupOrchestrator>>,
        notifications: Option<Arc<NotificationOrchestrator>>,
    ) -> Self {
        Self {
            backup,
            notifications,
        }
    }

    pub async fn report(&self) -> StatusReport {
        let backup = match &self.backup {
            Some(service) => Some(service.get_status().await),
            None => None,
        };
        let notifications = match &self.notifications {
            Some(service) => Some(service.get_status().await),
            None => None,
        };

        StatusReport {
            backup,
            notifications,
            generated_at: Utc::now(),
        }
    }
}
