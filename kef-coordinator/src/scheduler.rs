//! Periodic refresh task
//!
//! A [`PollingHandle`] owns the background task that triggers a refresh on
//! a fixed interval. Each tick's refresh runs to completion before the next
//! tick is scheduled; ticks missed while a slow refresh was running are
//! delayed rather than fired in a burst.

use std::future::Future;
use std::time::{Duration, SystemTime};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Handle to a running polling task
///
/// Dropping the handle aborts the task; [`PollingHandle::shutdown`] stops it
/// gracefully and waits for an in-progress refresh to finish.
#[derive(Debug)]
pub struct PollingHandle {
    name: String,
    interval: Duration,
    started_at: SystemTime,
    shutdown_signal: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// Spawn a task calling `tick` every `interval`, starting one interval from now
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero or if called outside a tokio runtime.
    pub fn spawn<F, Fut>(name: String, interval: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        assert!(!interval.is_zero(), "polling interval must be non-zero");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task_name = name.clone();
        let task_handle = tokio::spawn(async move {
            Self::polling_loop(task_name, interval, tick, shutdown_rx).await;
        });

        Self {
            name,
            interval,
            started_at: SystemTime::now(),
            shutdown_signal: Some(shutdown_tx),
            task_handle: Some(task_handle),
        }
    }

    async fn polling_loop<F, Fut>(
        name: String,
        interval: Duration,
        tick: F,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) where
        F: Fn() -> Fut,
        Fut: Future<Output = ()>,
    {
        debug!(name = %name, ?interval, "Starting polling task");

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Fires on an explicit shutdown and when the handle is dropped
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => tick().await,
            }
        }

        debug!(name = %name, "Polling task ended");
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Check if the task is still running
    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stop polling and wait for the task to finish
    pub async fn shutdown(mut self) {
        if let Some(signal) = self.shutdown_signal.take() {
            let _ = signal.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                warn!(name = %self.name, error = %e, "Polling task did not shut down cleanly");
            }
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}
