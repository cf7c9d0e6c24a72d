pub mod backup_service;
pub mod notification_service;
pub mod status;
pub mod sync_service;

pub use backup_service::{BackupJob, BackupOrchestrator, BackupRunResult, BackupStatusReport};
pub use notification_service::{
    NotificationJob, NotificationOrchestrator, NotificationReport, NotificationStatusReport,
};
pub use status::{StatusRegistry, StatusReport};
pub use sync_service::{RestoreReport, SyncOutcome, SyncReport, SyncService};
