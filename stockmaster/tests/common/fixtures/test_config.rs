//! Test configuration builder

use stockmaster::config::Config;

pub const TEST_RECIPIENT: &str = "lager@example.com";

pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.notifications.enabled = true;
        config.notifications.recipient = Some(TEST_RECIPIENT.to_string());
        Self { config }
    }

    pub fn backup_interval_hours(mut self, hours: f64) -> Self {
        self.config.backup.interval_hours = hours;
        self
    }

    pub fn keep_backups(mut self, keep: usize) -> Self {
        self.config.backup.keep_backups = keep;
        self
    }

    pub fn notify_on_completion(mut self, enabled: bool) -> Self {
        self.config.backup.notify_on_completion = enabled;
        self
    }

    pub fn notification_interval_hours(mut self, hours: f64) -> Self {
        self.config.notifications.interval_hours = hours;
        self
    }

    pub fn recipient(mut self, recipient: Option<&str>) -> Self {
        self.config.notifications.recipient = recipient.map(str::to_string);
        self
    }

    pub fn lookahead_days(mut self, days: u32) -> Self {
        self.config.notifications.lookahead_days = days;
        self
    }

    pub fn database_path(mut self, path: &str) -> Self {
        self.config.database_path = path.to_string();
        self
    }

    pub fn local_backup_dir(mut self, dir: &str) -> Self {
        self.config.local_backup_dir = dir.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
