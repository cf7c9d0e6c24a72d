//! Read-side view of the inventory the background services need.

use crate::errors::JobError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An item as it appears in an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub min_quantity: i64,
    pub unit: String,
    pub category_name: Option<String>,
    pub location_name: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub maintenance_interval_days: Option<i64>,
}

#[async_trait]
pub trait DomainScanner: Send + Sync {
    /// Items at or below their minimum quantity, lowest quantity first.
    async fn low_stock_items(&self) -> Result<Vec<ItemSummary>, JobError>;

    /// Items needing maintenance on or before today plus `lookahead_days`,
    /// earliest date first.
    async fn maintenance_due_items(&self, lookahead_days: u32) -> Result<Vec<ItemSummary>, JobError>;
}

pub trait SnapshotSource: Send + Sync {
    /// Path of the live data store file.
    fn current_path(&self) -> PathBuf;
}
