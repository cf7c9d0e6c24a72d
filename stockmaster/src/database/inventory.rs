//! Inventory scans behind the notification service.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::path::PathBuf;
use tracing::{debug, error};

use super::Database;
use crate::errors::JobError;
use crate::inventory::{DomainScanner, ItemSummary, SnapshotSource};

const ITEM_COLUMNS: &str = r#"
    SELECT i.id, i.name, i.quantity, i.min_quantity, i.unit,
           i.next_maintenance_date, i.maintenance_interval_days,
           c.name AS category_name,
           l.name AS location_name
    FROM items i
    LEFT JOIN categories c ON i.category_id = c.id
    LEFT JOIN locations l ON i.location_id = l.id
"#;

impl Database {
    pub async fn get_low_stock_items(&self) -> Result<Vec<ItemSummary>> {
        let sql = format!(
            "{} WHERE i.quantity <= i.min_quantity ORDER BY i.quantity ASC",
            ITEM_COLUMNS
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool()).await?;
        let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>>>()?;

        debug!("Low stock scan found {} items", items.len());
        Ok(items)
    }

    pub async fn get_maintenance_due_items(&self, lookahead_days: u32) -> Result<Vec<ItemSummary>> {
        let horizon = (Utc::now().date_naive() + Duration::days(lookahead_days as i64))
            .format("%Y-%m-%d")
            .to_string();
        let sql = format!(
            r#"{} WHERE i.requires_maintenance = 1
                 AND i.next_maintenance_date IS NOT NULL
                 AND i.next_maintenance_date <= ?
               ORDER BY i.next_maintenance_date ASC"#,
            ITEM_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(&horizon)
            .fetch_all(&self.pool())
            .await?;
        let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>>>()?;

        debug!(
            "Maintenance scan found {} items due on or before {}",
            items.len(),
            horizon
        );
        Ok(items)
    }
}

fn item_from_row(row: &SqliteRow) -> Result<ItemSummary> {
    let next_maintenance_date: Option<String> = row.try_get("next_maintenance_date")?;
    let unit: Option<String> = row.try_get("unit")?;

    Ok(ItemSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        quantity: row.try_get::<Option<i64>, _>("quantity")?.unwrap_or(0),
        min_quantity: row.try_get::<Option<i64>, _>("min_quantity")?.unwrap_or(0),
        unit: unit.unwrap_or_else(|| "pcs".to_string()),
        category_name: row.try_get("category_name")?,
        location_name: row.try_get("location_name")?,
        next_maintenance_date: next_maintenance_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()),
        maintenance_interval_days: row.try_get("maintenance_interval_days")?,
    })
}

#[async_trait]
impl DomainScanner for Database {
    async fn low_stock_items(&self) -> Result<Vec<ItemSummary>, JobError> {
        self.get_low_stock_items().await.map_err(|e| {
            error!("Low stock query failed: {}", e);
            JobError::Scan(format!("low stock query: {}", e))
        })
    }

    async fn maintenance_due_items(&self, lookahead_days: u32) -> Result<Vec<ItemSummary>, JobError> {
        self.get_maintenance_due_items(lookahead_days)
            .await
            .map_err(|e| {
                error!("Maintenance query failed: {}", e);
                JobError::Scan(format!("maintenance query: {}", e))
            })
    }
}

impl SnapshotSource for Database {
    fn current_path(&self) -> PathBuf {
        self.path.clone()
    }
}
