//! SQLite access for the background services.
//!
//! The inventory application owns the schema; this layer only makes sure the
//! tables it reads (`categories`, `locations`, `items`) and the `sync_log`
//! table exist, then serves:
//! - `inventory` - low stock and maintenance scans
//! - `sync_log` - sync/backup event history
//! - `records` - row types

mod inventory;
mod records;
mod sync_log;

pub use records::*;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, error, info};

pub struct Database {
    path: PathBuf,
    pool: RwLock<Pool<Sqlite>>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Opening inventory database: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    error!("Failed to create parent directory {:?}: {}", parent, e);
                    return Err(e.into());
                }
            }
        }

        let pool = Self::connect(database_path).await?;
        let database = Self {
            path: PathBuf::from(database_path),
            pool: RwLock::new(pool),
        };

        match database.initialize_tables().await {
            Ok(_) => info!("Database tables verified"),
            Err(e) => {
                error!("Database table initialization failed: {}", e);
                return Err(e);
            }
        }

        Ok(database)
    }

    /// Handle to the current pool. Cloning is cheap.
    pub fn pool(&self) -> Pool<Sqlite> {
        match self.pool.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close every connection so the file can be replaced on disk.
    pub async fn close(&self) {
        self.pool().close().await;
        debug!("Database pool closed: {}", self.path.display());
    }

    /// Open a fresh pool on the database file, e.g. after a restore swapped it.
    pub async fn reconnect(&self) -> Result<()> {
        let path = self.path.to_string_lossy().to_string();
        let pool = Self::connect(&path).await?;

        let previous = match self.pool.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, pool),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), pool),
        };
        previous.close().await;

        self.initialize_tables().await?;
        info!("Reconnected to database: {}", path);
        Ok(())
    }

    async fn connect(database_path: &str) -> Result<Pool<Sqlite>> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        match SqlitePool::connect(&database_url).await {
            Ok(pool) => Ok(pool),
            Err(e) => {
                error!("Failed to connect to database {}: {}", database_url, e);
                Err(e.into())
            }
        }
    }

    async fn initialize_tables(&self) -> Result<()> {
        let pool = self.pool();

        let statements = [
            (
                "categories",
                r#"
                CREATE TABLE IF NOT EXISTS categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    organization_id INTEGER,
                    name TEXT NOT NULL,
                    description TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
                "#,
            ),
            (
                "locations",
                r#"
                CREATE TABLE IF NOT EXISTS locations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    organization_id INTEGER,
                    name TEXT NOT NULL,
                    description TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
                "#,
            ),
            (
                "items",
                r#"
                CREATE TABLE IF NOT EXISTS items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    organization_id INTEGER,
                    sku TEXT,
                    name TEXT NOT NULL,
                    description TEXT,
                    category_id INTEGER,
                    location_id INTEGER,
                    quantity INTEGER DEFAULT 0,
                    min_quantity INTEGER DEFAULT 0,
                    unit TEXT DEFAULT 'pcs',
                    requires_maintenance BOOLEAN DEFAULT 0,
                    maintenance_interval_days INTEGER,
                    last_maintenance_date DATE,
                    next_maintenance_date DATE,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (category_id) REFERENCES categories (id),
                    FOREIGN KEY (location_id) REFERENCES locations (id)
                )
                "#,
            ),
            (
                "sync_log",
                r#"
                CREATE TABLE IF NOT EXISTS sync_log (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    organization_id INTEGER,
                    sync_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    status TEXT,
                    message TEXT
                )
                "#,
            ),
        ];

        for (table, sql) in statements {
            if let Err(e) = sqlx::query(sql).execute(&pool).await {
                error!("Failed to create {} table: {}", table, e);
                return Err(e.into());
            }
            debug!("{} table ready", table);
        }

        Ok(())
    }
}
