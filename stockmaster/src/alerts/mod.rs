//! Outbound alerts: the notification port, the bundled webhook adapter and
//! the message templates.

pub mod templates;
pub mod webhook;

pub use templates::ComposedAlert;
pub use webhook::WebhookNotifier;

use crate::inventory::ItemSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Deliver one message. Returns `false` on any failure; never errors.
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
        body_text: Option<&str>,
    ) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    MaintenanceDue,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::LowStock => "low_stock",
            AlertKind::MaintenanceDue => "maintenance_due",
        }
    }
}

/// All findings of one category from one scan, sent as a single message.
#[derive(Debug, Clone)]
pub struct AlertBatch {
    pub kind: AlertKind,
    pub items: Vec<ItemSummary>,
    pub generated_at: DateTime<Utc>,
}

impl AlertBatch {
    pub fn new(kind: AlertKind, items: Vec<ItemSummary>) -> Self {
        Self {
            kind,
            items,
            generated_at: Utc::now(),
        }
    }
}
