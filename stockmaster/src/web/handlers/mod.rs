pub mod backup;
pub mod common;
pub mod notifications;
pub mod status;

pub use backup::{
    download_backup, execute_manual_backup, execute_manual_sync, get_backup_status,
    get_sync_status, list_backups, restore_backup,
};
pub use common::{ApiResponse, ApiResult};
pub use notifications::{execute_notification_check, get_notification_status};
pub use status::get_status;
