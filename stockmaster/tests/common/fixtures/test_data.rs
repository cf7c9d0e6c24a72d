//! Common test data

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fake::faker::lorem::en::Word;
use fake::Fake;
use std::path::{Path, PathBuf};

use stockmaster::inventory::{ItemSummary, SnapshotSource};
use stockmaster::remote::SnapshotRecord;

/// Snapshot source pointing at a fixed file
pub struct StaticSource(pub PathBuf);

impl SnapshotSource for StaticSource {
    fn current_path(&self) -> PathBuf {
        self.0.clone()
    }
}

/// Write a small stand-in for the live database file
pub fn write_data_file(dir: &Path) -> PathBuf {
    let path = dir.join("inventory.db");
    std::fs::write(&path, b"SQLite format 3\0test-bytes").unwrap();
    path
}

pub fn low_stock_item(id: i64, quantity: i64, min_quantity: i64) -> ItemSummary {
    let word: String = Word().fake();
    ItemSummary {
        id,
        name: format!("{} {}", word, id),
        quantity,
        min_quantity,
        unit: "pcs".to_string(),
        category_name: Some("Consumables".to_string()),
        location_name: Some("Shelf A".to_string()),
        next_maintenance_date: None,
        maintenance_interval_days: None,
    }
}

pub fn maintenance_item(id: i64, due: NaiveDate) -> ItemSummary {
    let word: String = Word().fake();
    ItemSummary {
        id,
        name: format!("{} {}", word, id),
        quantity: 1,
        min_quantity: 0,
        unit: "pcs".to_string(),
        category_name: Some("Machines".to_string()),
        location_name: Some("Workshop".to_string()),
        next_maintenance_date: Some(due),
        maintenance_interval_days: Some(90),
    }
}

/// `count` remote snapshots, one per day, all older than any new upload.
/// `old-0` is the oldest.
pub fn seeded_snapshots(count: usize) -> Vec<SnapshotRecord> {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 2, 0, 0).unwrap();
    let mut records: Vec<SnapshotRecord> = (0..count)
        .map(|i| {
            let created_at = base + Duration::days(i as i64);
            SnapshotRecord {
                id: format!("old-{}", i),
                display_name: format!(
                    "inventory_backup_{}.db",
                    created_at.format("%Y%m%d_%H%M%S")
                ),
                created_at,
                size: Some(2048),
                link: None,
            }
        })
        .collect();
    records.reverse();
    records
}
