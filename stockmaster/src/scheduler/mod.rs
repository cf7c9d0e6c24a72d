//! Interval scheduling for the background services
//!
//! Each service wraps one [`Job`] in a [`ServiceRunner`]. The runner owns the
//! lifecycle (start, stop, manual trigger), the periodic loop and the status
//! snapshot read by the web layer.
//!
//! # Timing
//!
//! The loop wakes every poll quantum (60 s by default) and runs the job once
//! the configured interval has elapsed since the previous scheduled run.
//! Precision is therefore bounded by the quantum. Scheduler state lives for
//! the process only; a restart begins with an immediate run.

pub mod runner;
pub use runner::ServiceRunner;

use crate::errors::JobError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A unit of periodic work.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    type Output: Send + 'static;

    fn name(&self) -> &'static str;

    /// Preflight checks run once by `start()`. A configuration error refuses
    /// the start; any other error is logged and the start continues.
    async fn prepare(&self) -> Result<(), JobError> {
        Ok(())
    }

    async fn run(&self) -> Result<Self::Output, JobError>;

    /// Reason a completed run should still count as a failure.
    fn failure(&self, _output: &Self::Output) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    Failure,
    NeverRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Scheduled,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Scheduled => "scheduled",
            Trigger::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    Refused(String),
}

/// Point-in-time view of one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub is_running: bool,
    pub interval_hours: f64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_run_outcome: RunOutcome,
    pub last_error: Option<String>,
    pub run_count: u64,
    pub next_run_at: Option<DateTime<Utc>>,
}

/// Mutable half of the status, replaced as a whole under the runner's lock.
#[derive(Debug, Clone)]
pub(crate) struct RunnerState {
    pub is_running: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_run_outcome: RunOutcome,
    pub last_error: Option<String>,
    pub run_count: u64,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self {
            is_running: false,
            last_run_at: None,
            last_run_outcome: RunOutcome::NeverRun,
            last_error: None,
            run_count: 0,
        }
    }
}

impl RunnerState {
    pub fn to_status(&self, interval: Duration) -> ServiceStatus {
        let next_run_at = match (self.is_running, self.last_run_at) {
            (true, Some(last)) => chrono::Duration::from_std(interval)
                .ok()
                .and_then(|step| last.checked_add_signed(step)),
            _ => None,
        };

        ServiceStatus {
            is_running: self.is_running,
            interval_hours: interval.as_secs_f64() / 3600.0,
            last_run_at: self.last_run_at,
            last_run_outcome: self.last_run_outcome,
            last_error: self.last_error.clone(),
            run_count: self.run_count,
            next_run_at,
        }
    }
}
