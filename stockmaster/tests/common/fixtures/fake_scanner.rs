//! Scripted inventory scanner

use async_trait::async_trait;
use std::sync::Mutex;

use stockmaster::errors::JobError;
use stockmaster::inventory::{DomainScanner, ItemSummary};

#[derive(Default)]
pub struct FakeScanner {
    low_stock: Mutex<Vec<ItemSummary>>,
    maintenance: Mutex<Vec<ItemSummary>>,
    fail_low_stock: bool,
    fail_maintenance: bool,
    last_lookahead: Mutex<Option<u32>>,
}

impl FakeScanner {
    pub fn new(low_stock: Vec<ItemSummary>, maintenance: Vec<ItemSummary>) -> Self {
        Self {
            low_stock: Mutex::new(low_stock),
            maintenance: Mutex::new(maintenance),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing_low_stock(mut self) -> Self {
        self.fail_low_stock = true;
        self
    }

    pub fn failing_maintenance(mut self) -> Self {
        self.fail_maintenance = true;
        self
    }

    pub fn last_lookahead(&self) -> Option<u32> {
        *self.last_lookahead.lock().unwrap()
    }
}

#[async_trait]
impl DomainScanner for FakeScanner {
    async fn low_stock_items(&self) -> Result<Vec<ItemSummary>, JobError> {
        if self.fail_low_stock {
            return Err(JobError::Scan("database is locked".to_string()));
        }
        Ok(self.low_stock.lock().unwrap().clone())
    }

    async fn maintenance_due_items(&self, lookahead_days: u32) -> Result<Vec<ItemSummary>, JobError> {
        *self.last_lookahead.lock().unwrap() = Some(lookahead_days);
        if self.fail_maintenance {
            return Err(JobError::Scan("database is locked".to_string()));
        }
        Ok(self.maintenance.lock().unwrap().clone())
    }
}
