use super::Config;
use crate::errors::ConfigError;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

pub const ENV_AUTO_BACKUP_ENABLED: &str = "AUTO_BACKUP_ENABLED";
pub const ENV_BACKUP_INTERVAL_HOURS: &str = "BACKUP_INTERVAL_HOURS";
pub const ENV_KEEP_BACKUPS: &str = "KEEP_BACKUPS";
pub const ENV_NOTIFICATIONS_ENABLED: &str = "NOTIFICATIONS_ENABLED";
pub const ENV_NOTIFICATION_EMAIL: &str = "NOTIFICATION_EMAIL";
pub const ENV_NOTIFICATION_INTERVAL_HOURS: &str = "NOTIFICATION_CHECK_INTERVAL_HOURS";

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let mut config = Self::load_configuration(&config_dir).await?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        validate(&config)?;

        info!(
            "Configuration loaded: backup {} (every {}h, keep {}), notifications {} (every {}h)",
            if config.backup.enabled { "enabled" } else { "disabled" },
            config.backup.interval_hours,
            config.backup.keep_backups,
            if config.notifications.enabled { "enabled" } else { "disabled" },
            config.notifications.interval_hours,
        );

        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    /// Wrap an already-built configuration (tests, embedding).
    pub fn from_config(config: Config) -> Result<Self> {
        validate(&config)?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        debug!("Loading main config: {}", main_config_path);

        let main_config_content = fs::read_to_string(&main_config_path).await.map_err(|e| {
            anyhow!(ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })
        })?;

        let config: Config = toml::from_str(&main_config_content).map_err(|e| {
            anyhow!(ConfigError::ParseError {
                reason: e.to_string(),
            })
        })?;

        Ok(config)
    }
}

/// Apply the environment variables the inventory application has always
/// honoured on top of the file configuration.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_AUTO_BACKUP_ENABLED) {
        config.backup.enabled = parse_flag(&value);
        debug!("{} override: {}", ENV_AUTO_BACKUP_ENABLED, config.backup.enabled);
    }

    if let Some(value) = lookup(ENV_BACKUP_INTERVAL_HOURS) {
        config.backup.interval_hours = parse_number(ENV_BACKUP_INTERVAL_HOURS, &value)?;
    }

    if let Some(value) = lookup(ENV_KEEP_BACKUPS) {
        config.backup.keep_backups =
            value
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: ENV_KEEP_BACKUPS.to_string(),
                    reason: e.to_string(),
                })?;
    }

    if let Some(value) = lookup(ENV_NOTIFICATIONS_ENABLED) {
        config.notifications.enabled = parse_flag(&value);
    }

    if let Some(value) = lookup(ENV_NOTIFICATION_EMAIL) {
        let value = value.trim().to_string();
        config.notifications.recipient = if value.is_empty() { None } else { Some(value) };
    }

    if let Some(value) = lookup(ENV_NOTIFICATION_INTERVAL_HOURS) {
        config.notifications.interval_hours =
            parse_number(ENV_NOTIFICATION_INTERVAL_HOURS, &value)?;
    }

    Ok(())
}

/// Reject configurations the services cannot run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    check_interval("backup.interval_hours", config.backup.interval_hours)?;
    check_interval(
        "notifications.interval_hours",
        config.notifications.interval_hours,
    )?;

    if config.backup.keep_backups == 0 {
        return Err(ConfigError::InvalidValue {
            field: "backup.keep_backups".to_string(),
            reason: "must keep at least one snapshot".to_string(),
        });
    }

    if config.scheduler.poll_interval_seconds == 0 {
        return Err(ConfigError::InvalidValue {
            field: "scheduler.poll_interval_seconds".to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }

    if config.notifications.enabled && config.notifications.recipient.is_none() {
        warn!("Notifications enabled but notifications.recipient is not set - the notification service will refuse to start");
    }

    if config.backup.enabled && config.remote.base_url.is_empty() {
        warn!("Backups enabled but no remote store configured - runs will fail until remote.base_url is set");
    }

    Ok(())
}

fn check_interval(field: &str, hours: f64) -> Result<(), ConfigError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} is not a positive number of hours", hours),
        });
    }
    if Duration::try_from_secs_f64(hours * 3600.0).is_err() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} hours is too large", hours),
        });
    }
    Ok(())
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_number(field: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
}
