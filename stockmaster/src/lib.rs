pub mod alerts;
pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod inventory;
pub mod remote;
pub mod retention;
pub mod scheduler;
pub mod services;
pub mod web;

// Re-export commonly used types
pub use alerts::{NotificationPort, WebhookNotifier};
pub use config::{Config, ConfigManager};
pub use database::Database;
pub use errors::{ConfigError, JobError, RemoteError};
pub use inventory::{DomainScanner, ItemSummary, SnapshotSource};
pub use remote::{HttpRemoteStore, RemoteSyncPort, SnapshotRecord};
pub use retention::{RetentionDecision, RetentionPolicy};
pub use scheduler::{Job, RunOutcome, ServiceRunner, ServiceStatus, StartOutcome};
pub use services::{BackupOrchestrator, NotificationOrchestrator, StatusRegistry, SyncService};
