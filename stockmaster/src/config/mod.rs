pub mod manager;
use serde::{Deserialize, Serialize};
use std::time::Duration;
pub use manager::ConfigManager;

use crate::constants::{backup, defaults, http, notifications, scheduler};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_local_backup_dir")]
    pub local_backup_dir: String,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub remote: RemoteStoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_backup_interval_hours")]
    pub interval_hours: f64,
    #[serde(default = "default_keep_backups")]
    pub keep_backups: usize,
    // Push a backup status alert through the notification service after each run
    #[serde(default)]
    pub notify_on_completion: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_notification_interval_hours")]
    pub interval_hours: f64,
    pub recipient: Option<String>,
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    // Mail relay endpoint; empty disables delivery
    #[serde(default)]
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStoreConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_folder_name")]
    pub folder_name: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_stop_grace")]
    pub stop_grace_seconds: u64,
}

impl Config {
    pub fn backup_interval(&self) -> Duration {
        hours_to_duration(self.backup.interval_hours)
    }

    pub fn notification_interval(&self) -> Duration {
        hours_to_duration(self.notifications.interval_hours)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.poll_interval_seconds)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.scheduler.stop_grace_seconds)
    }
}

/// Fractional hours are allowed so short test intervals (e.g. 0.1h) work.
/// Values outside `Duration`'s range saturate; `validate` rejects them first.
pub fn hours_to_duration(hours: f64) -> Duration {
    match Duration::try_from_secs_f64(hours * 3600.0) {
        Ok(duration) => duration,
        Err(_) if hours > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            local_backup_dir: default_local_backup_dir(),
            backup: BackupConfig::default(),
            notifications: NotificationConfig::default(),
            remote: RemoteStoreConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: default_backup_interval_hours(),
            keep_backups: default_keep_backups(),
            notify_on_completion: false,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_hours: default_notification_interval_hours(),
            recipient: None,
            lookahead_days: default_lookahead_days(),
            webhook_url: String::new(),
        }
    }
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            folder_name: default_folder_name(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            stop_grace_seconds: default_stop_grace(),
        }
    }
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_database_path() -> String {
    defaults::DATABASE_PATH.to_string()
}

fn default_local_backup_dir() -> String {
    defaults::LOCAL_BACKUP_DIR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_backup_interval_hours() -> f64 {
    backup::INTERVAL_HOURS
}

fn default_keep_backups() -> usize {
    backup::KEEP_BACKUPS
}

fn default_notification_interval_hours() -> f64 {
    notifications::INTERVAL_HOURS
}

fn default_lookahead_days() -> u32 {
    notifications::LOOKAHEAD_DAYS
}

fn default_folder_name() -> String {
    backup::REMOTE_FOLDER_NAME.to_string()
}

fn default_request_timeout() -> u64 {
    http::REQUEST_TIMEOUT.as_secs()
}

fn default_poll_interval() -> u64 {
    scheduler::POLL_INTERVAL.as_secs()
}

fn default_stop_grace() -> u64 {
    scheduler::STOP_GRACE_PERIOD.as_secs()
}
