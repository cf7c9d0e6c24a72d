//! Central repository for intervals, timeouts and limits used by the
//! background services.
//!
//! Constants are grouped by concern so the scheduler, the orchestrators and the
//! HTTP adapters all read their defaults from one place.

use std::time::Duration;

/// Scheduler loop timing
pub mod scheduler {
    use super::Duration;

    /// How often a service loop wakes up to check whether its job is due
    pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

    /// How long `stop()` waits for a loop to finish before detaching it
    pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);
}

/// Backup service defaults
pub mod backup {
    /// Default hours between scheduled backups
    pub const INTERVAL_HOURS: f64 = 24.0;

    /// Default number of remote snapshots kept after pruning
    pub const KEEP_BACKUPS: usize = 30;

    /// Upper bound on snapshots fetched when computing retention
    pub const RETENTION_LIST_LIMIT: usize = 1000;

    /// Default page size for the snapshot listing endpoint
    pub const LIST_LIMIT: usize = 50;

    /// Prefix of every snapshot file name, remote and local
    pub const SNAPSHOT_PREFIX: &str = "inventory_backup_";

    /// Prefix of the attachment name served by the download endpoint
    pub const DOWNLOAD_PREFIX: &str = "stockmaster_backup_";

    /// Prefix of the safety copy written before a restore
    pub const PRE_RESTORE_PREFIX: &str = "inventory_before_restore_";

    /// Timestamp format embedded in snapshot names
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Default remote folder holding the snapshots
    pub const REMOTE_FOLDER_NAME: &str = "StockMaster Backups";
}

/// Notification service defaults
pub mod notifications {
    /// Default hours between inventory checks
    pub const INTERVAL_HOURS: f64 = 24.0;

    /// Default lookahead window for maintenance reminders
    pub const LOOKAHEAD_DAYS: u32 = 7;

    /// Webhook request timeout
    pub const WEBHOOK_TIMEOUT_SECONDS: u64 = 10;
}

/// HTTP client timeouts for the remote store
pub mod http {
    use super::Duration;

    /// Default timeout for remote store requests (uploads can be large)
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    /// Timeout for establishing connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Default configuration values for the web surface and storage paths
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 5000;
    pub const DATABASE_PATH: &str = "inventory.db";
    pub const LOCAL_BACKUP_DIR: &str = "backups";

    /// Number of sync log entries returned by the sync status endpoint
    pub const SYNC_LOG_ENTRIES: i64 = 20;
}
