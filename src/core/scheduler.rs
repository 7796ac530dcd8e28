//! Recurring flush trigger

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default cadence of the periodic flush
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

/// Owns at most one recurring task
///
/// Arming always aborts the previous task first, so two triggers never run
/// side by side. Dropping the scheduler disarms it.
#[derive(Debug, Default)]
pub struct FlushScheduler {
    task: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

impl FlushScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start calling `tick` every `period`, first call one period from now
    ///
    /// The loop ends when `tick` resolves to `ControlFlow::Break`.
    pub fn arm<F, Fut>(&mut self, runtime: &Handle, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.disarm();

        let task = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    break;
                }
            }
        });

        self.task = Some(task);
        self.period = Some(period);
    }

    /// Cancel the trigger
    ///
    /// A tick that is running is aborted at its next await point; tasks it
    /// spawned keep running.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
