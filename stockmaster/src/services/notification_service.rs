//! Periodic inventory alerts
//!
//! Each run performs two independent scans (low stock, maintenance due) and
//! sends at most one batched message per non-empty category to the configured
//! recipient. A failure in one category never blocks the other. There is no
//! suppression across runs: an item that stays low is reported every run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::alerts::templates::{self, ComposedAlert};
use crate::alerts::{AlertBatch, AlertKind, NotificationPort};
use crate::config::Config;
use crate::errors::{ConfigError, JobError};
use crate::inventory::{DomainScanner, ItemSummary};
use crate::scheduler::{Job, ServiceRunner, ServiceStatus, StartOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationReport {
    pub low_stock_items: usize,
    pub maintenance_items: usize,
    pub notifications_sent: usize,
    pub failures: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

pub struct NotificationJob {
    scanner: Arc<dyn DomainScanner>,
    notifier: Arc<dyn NotificationPort>,
    recipient: Option<String>,
    lookahead_days: u32,
}

impl NotificationJob {
    pub fn new(
        scanner: Arc<dyn DomainScanner>,
        notifier: Arc<dyn NotificationPort>,
        recipient: Option<String>,
        lookahead_days: u32,
    ) -> Self {
        Self {
            scanner,
            notifier,
            recipient,
            lookahead_days,
        }
    }

    fn recipient(&self) -> Result<&str, ConfigError> {
        self.recipient
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "notifications.recipient".to_string(),
            })
    }

    #[instrument(skip(self))]
    pub async fn check_and_notify(&self) -> Result<NotificationReport, JobError> {
        let recipient = self.recipient()?;
        info!("Starting inventory notification check");

        let mut report = NotificationReport {
            low_stock_items: 0,
            maintenance_items: 0,
            notifications_sent: 0,
            failures: Vec::new(),
            checked_at: Utc::now(),
        };

        let low_stock = self.scanner.low_stock_items().await;
        self.handle_category(recipient, AlertKind::LowStock, low_stock, &mut report)
            .await;

        let maintenance = self.scanner.maintenance_due_items(self.lookahead_days).await;
        self.handle_category(recipient, AlertKind::MaintenanceDue, maintenance, &mut report)
            .await;

        info!(
            "Notification check finished - {} message(s) sent",
            report.notifications_sent
        );
        Ok(report)
    }

    async fn handle_category(
        &self,
        recipient: &str,
        kind: AlertKind,
        scan: Result<Vec<ItemSummary>, JobError>,
        report: &mut NotificationReport,
    ) {
        let items = match scan {
            Ok(items) => items,
            Err(e) => {
                warn!("{} scan failed: {}", kind.as_str(), e);
                report.failures.push(format!("{}: {}", kind.as_str(), e));
                return;
            }
        };

        match kind {
            AlertKind::LowStock => report.low_stock_items = items.len(),
            AlertKind::MaintenanceDue => report.maintenance_items = items.len(),
        }

        if items.is_empty() {
            debug!("No {} findings", kind.as_str());
            return;
        }

        let count = items.len();
        let batch = AlertBatch::new(kind, items);
        let alert = templates::compose(&batch);

        if self.deliver(recipient, &alert).await {
            report.notifications_sent += 1;
            info!("Sent {} alert ({} items)", kind.as_str(), count);
        } else {
            warn!("Delivery of {} alert ({} items) failed", kind.as_str(), count);
            report
                .failures
                .push(format!("{}: delivery failed", kind.as_str()));
        }
    }

    async fn deliver(&self, recipient: &str, alert: &ComposedAlert) -> bool {
        self.notifier
            .send(
                recipient,
                &alert.subject,
                &alert.body_html,
                Some(&alert.body_text),
            )
            .await
    }

    /// One-off message about a finished backup. Skipped without a recipient.
    pub async fn notify_backup_status(
        &self,
        success: bool,
        snapshot_name: Option<&str>,
        error: Option<&str>,
    ) -> bool {
        let Some(recipient) = self.recipient.as_deref() else {
            debug!("No recipient configured, skipping backup status message");
            return false;
        };

        info!("Sending backup status message (success: {})", success);
        let alert = templates::backup_status(success, snapshot_name, error);
        self.deliver(recipient, &alert).await
    }
}

#[async_trait]
impl Job for NotificationJob {
    type Output = NotificationReport;

    fn name(&self) -> &'static str {
        "notifications"
    }

    async fn prepare(&self) -> Result<(), JobError> {
        let recipient = self.recipient()?;
        info!("Notifications go to: {}", recipient);
        Ok(())
    }

    async fn run(&self) -> Result<NotificationReport, JobError> {
        self.check_and_notify().await
    }

    fn failure(&self, output: &NotificationReport) -> Option<String> {
        if output.failures.is_empty() {
            None
        } else {
            Some(output.failures.join("; "))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationStatusReport {
    #[serde(flatten)]
    pub service: ServiceStatus,
    pub recipient: Option<String>,
    pub lookahead_days: u32,
}

pub struct NotificationOrchestrator {
    runner: ServiceRunner<NotificationJob>,
}

impl NotificationOrchestrator {
    pub fn new(
        config: &Config,
        scanner: Arc<dyn DomainScanner>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        let job = NotificationJob::new(
            scanner,
            notifier,
            config.notifications.recipient.clone(),
            config.notifications.lookahead_days,
        );

        Self {
            runner: ServiceRunner::new(
                Arc::new(job),
                config.notification_interval(),
                config.poll_interval(),
                config.stop_grace(),
            ),
        }
    }

    pub async fn start(&self) -> StartOutcome {
        self.runner.start().await
    }

    pub async fn stop(&self) {
        self.runner.stop().await
    }

    pub async fn trigger_manual_notification_check(&self) -> Result<NotificationReport, JobError> {
        self.runner.trigger_now().await
    }

    pub async fn notify_backup_status(
        &self,
        success: bool,
        snapshot_name: Option<&str>,
        error: Option<&str>,
    ) -> bool {
        self.runner
            .job()
            .notify_backup_status(success, snapshot_name, error)
            .await
    }

    pub async fn get_status(&self) -> NotificationStatusReport {
        let job = self.runner.job();
        NotificationStatusReport {
            service: self.runner.status().await,
            recipient: job.recipient.clone(),
            lookahead_days: job.lookahead_days,
        }
    }
}
