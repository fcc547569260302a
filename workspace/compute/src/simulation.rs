use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{ComputeError, Result};

/// Delays of the simulated backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationDelays {
    pub forecast: Duration,
    pub upload: Duration,
    pub reply: Duration,
}

impl SimulationDelays {
    /// The same delay for every simulation.
    pub fn uniform(delay: Duration) -> Self {
        Self {
            forecast: delay,
            upload: delay,
            reply: delay,
        }
    }
}

impl Default for SimulationDelays {
    fn default() -> Self {
        Self {
            forecast: Duration::from_millis(3000),
            upload: Duration::from_millis(2000),
            reply: Duration::from_millis(1500),
        }
    }
}

/// A delayed unit of simulated work running on the tokio runtime.
///
/// Dropping the task aborts it, so replacing a pending task never leaves a
/// timer behind. Must be created from within a runtime.
#[derive(Debug)]
pub struct PendingTask<T> {
    label: String,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> PendingTask<T> {
    /// Spawns a task that sleeps for `delay` and then runs `work`.
    pub fn schedule<F>(label: impl Into<String>, delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let label = label.into();
        debug!(task = %label, ?delay, "Scheduling simulated task");

        let task_label = label.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(task = %task_label, "Simulated task completed");
            work()
        });

        Self { label, handle }
    }
}

impl<T> PendingTask<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Aborts the task. Waiting on it afterwards yields `Cancelled`.
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            debug!(task = %self.label, "Cancelling simulated task");
        }
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task and returns its value.
    pub async fn wait(mut self) -> Result<T> {
        match (&mut self.handle).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_cancelled() => Err(ComputeError::Cancelled(self.label.clone())),
            Err(err) => Err(ComputeError::Runtime(format!(
                "{} failed: {}",
                self.label, err
            ))),
        }
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_default_delays() {
        let delays = SimulationDelays::default();
        assert_eq!(delays.forecast, Duration::from_millis(3000));
        assert_eq!(delays.upload, Duration::from_millis(2000));
        assert_eq!(delays.reply, Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_completes_after_delay() {
        let task = PendingTask::schedule("forecast", Duration::from_millis(3000), || 42);
        assert!(!task.is_finished());

        let started = tokio::time::Instant::now();
        assert_eq!(task.wait().await.unwrap(), 42);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let task = PendingTask::schedule("upload", Duration::from_millis(2000), move || {
            flag.store(true, Ordering::SeqCst);
        });

        task.cancel();
        let err = task.wait().await.unwrap_err();
        assert!(matches!(err, ComputeError::Cancelled(label) if label == "upload"));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_task_aborts_it() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let task = PendingTask::schedule("reply", Duration::from_millis(1500), move || {
            flag.store(true, Ordering::SeqCst);
        });
        drop(task);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
