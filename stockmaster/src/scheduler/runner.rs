use super::{Job, RunOutcome, RunnerState, ServiceStatus, StartOutcome, Trigger};
use crate::errors::JobError;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

struct Shared<J: Job> {
    job: Arc<J>,
    interval: Duration,
    poll: Duration,
    state: RwLock<RunnerState>,
}

impl<J: Job> Shared<J> {
    async fn record_run(&self, failure: Option<String>) {
        let mut state = self.state.write().await;
        let previous = state.clone();
        *state = RunnerState {
            is_running: previous.is_running,
            last_run_at: Some(Utc::now()),
            last_run_outcome: if failure.is_some() {
                RunOutcome::Failure
            } else {
                RunOutcome::Success
            },
            last_error: failure.or(previous.last_error),
            run_count: previous.run_count + 1,
        };
    }

    async fn set_running(&self, is_running: bool) {
        let mut state = self.state.write().await;
        *state = RunnerState {
            is_running,
            ..state.clone()
        };
    }
}

/// Lifecycle wrapper around one periodic job.
///
/// At most one loop exists per runner. Errors and panics from the job are
/// recorded in the status and never reach the caller of `start()`.
pub struct ServiceRunner<J: Job> {
    shared: Arc<Shared<J>>,
    active: AtomicBool,
    stop_grace: Duration,
    shutdown_tx: Mutex<Option<watch::Sender<bool>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<J: Job> ServiceRunner<J> {
    pub fn new(job: Arc<J>, interval: Duration, poll: Duration, stop_grace: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                job,
                interval,
                poll,
                state: RwLock::new(RunnerState::default()),
            }),
            active: AtomicBool::new(false),
            stop_grace,
            shutdown_tx: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    pub fn job(&self) -> &Arc<J> {
        &self.shared.job
    }

    pub async fn start(&self) -> StartOutcome {
        let name = self.shared.job.name();

        if self.active.swap(true, Ordering::SeqCst) {
            warn!("{} service is already running", name);
            return StartOutcome::AlreadyRunning;
        }

        // Armed before the first run so a stop() issued meanwhile is seen
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        match self.shared.job.prepare().await {
            Ok(()) => {}
            Err(e) if e.is_config() => {
                error!("{} service not started: {}", name, e);
                self.shutdown_tx.lock().await.take();
                self.active.store(false, Ordering::SeqCst);
                return StartOutcome::Refused(e.to_string());
            }
            Err(e) => {
                warn!("{} preflight failed, starting anyway: {}", name, e);
            }
        }

        info!(
            "Starting {} service (interval: {:.2}h)",
            name,
            self.shared.interval.as_secs_f64() / 3600.0
        );

        let stop_requested = *shutdown_rx.borrow();
        if !stop_requested {
            // Result already recorded in the status
            let _ = Self::execute(&self.shared, Trigger::Startup).await;
        }

        // stop() joins through this lock, so it observes either no loop or a spawned one
        let mut handle = self.handle.lock().await;
        let stop_requested = *shutdown_rx.borrow();
        if stop_requested {
            info!("{} service stopped during startup, loop not spawned", name);
            return StartOutcome::Started;
        }

        self.shared.set_running(true).await;
        *handle = Some(tokio::spawn(Self::run_loop(
            self.shared.clone(),
            shutdown_rx,
        )));

        info!("{} service started", name);
        StartOutcome::Started
    }

    pub async fn stop(&self) {
        let name = self.shared.job.name();

        if !self.active.load(Ordering::SeqCst) {
            debug!("{} service is not running", name);
            return;
        }

        info!("Stopping {} service...", name);

        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(true);
        }

        if let Some(handle) = self.handle.lock().await.take() {
            match timeout(self.stop_grace, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("{} loop ended abnormally: {}", name, e),
                Err(_) => warn!(
                    "{} loop did not finish within {:?}, leaving it detached",
                    name, self.stop_grace
                ),
            }
        }

        self.shared.set_running(false).await;
        self.active.store(false, Ordering::SeqCst);
        info!("{} service stopped", name);
    }

    /// Run the job now on the caller's task. Not serialized against a
    /// scheduled run that fires at the same time.
    pub async fn trigger_now(&self) -> Result<J::Output, JobError> {
        Self::execute(&self.shared, Trigger::Manual).await
    }

    pub async fn status(&self) -> ServiceStatus {
        self.shared.state.read().await.to_status(self.shared.interval)
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    async fn run_loop(shared: Arc<Shared<J>>, mut shutdown_rx: watch::Receiver<bool>) {
        let name = shared.job.name();
        let mut last_scheduled = Instant::now();
        let mut ticker = interval_at(Instant::now() + shared.poll, shared.poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!("{} loop armed (poll every {:?})", name, shared.poll);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    if !shared.state.read().await.is_running {
                        break;
                    }
                    if last_scheduled.elapsed() >= shared.interval {
                        let _ = Self::execute(&shared, Trigger::Scheduled).await;
                        last_scheduled = Instant::now();
                    }
                }
            }
        }

        debug!("{} loop exited", name);
    }

    async fn execute(shared: &Shared<J>, trigger: Trigger) -> Result<J::Output, JobError> {
        let name = shared.job.name();
        let run_id = Uuid::new_v4();
        let span = info_span!("job_run", job = name, run_id = %run_id, trigger = trigger.as_str());

        async move {
            debug!("{} run starting", name);

            let result = match AssertUnwindSafe(shared.job.run()).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(JobError::Panicked(panic_message(payload.as_ref()))),
            };

            let failure = match &result {
                Ok(output) => shared.job.failure(output),
                Err(e) => Some(e.to_string()),
            };

            match &failure {
                None => info!("{} run succeeded", name),
                Some(reason) => error!("{} run failed: {}", name, reason),
            }

            shared.record_run(failure).await;
            result
        }
        .instrument(span)
        .await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
