//! Temporary on-disk SQLite databases
//!
//! Restore and fallback copy the database file, so tests use a real file in a
//! temp directory rather than `sqlite::memory:`.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use stockmaster::database::Database;

pub struct TestDatabase {
    pub dir: TempDir,
    pub database: Arc<Database>,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("inventory.db");
        let database = Arc::new(Database::new(&path.to_string_lossy()).await?);
        Ok(Self { dir, database })
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    pub async fn insert_category(&self, name: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.database.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_location(&self, name: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO locations (name) VALUES (?)")
            .bind(name)
            .execute(&self.database.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_item(
        &self,
        name: &str,
        quantity: i64,
        min_quantity: i64,
        category_id: Option<i64>,
        location_id: Option<i64>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO items (name, quantity, min_quantity, category_id, location_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(quantity)
        .bind(min_quantity)
        .bind(category_id)
        .bind(location_id)
        .execute(&self.database.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_maintenance_item(
        &self,
        name: &str,
        requires_maintenance: bool,
        next_maintenance_date: Option<&str>,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (name, quantity, min_quantity, requires_maintenance,
                               maintenance_interval_days, next_maintenance_date)
            VALUES (?, 10, 1, ?, 30, ?)
            "#,
        )
        .bind(name)
        .bind(requires_maintenance)
        .bind(next_maintenance_date)
        .execute(&self.database.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }
}
