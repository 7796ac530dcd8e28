//! Buffering and flush state machine
//!
//! A [`LogShipper`] owns the pending line buffer, the active configuration
//! and the periodic trigger. Handles are cheap to clone and all clones
//! share one state; [`LogShipper::global`] provides the process-wide
//! instance used by the crate-level functions.
//!
//! ```text
//!   Unconfigured ──configure──▶ Configured ◀──configure──┐
//!        │                        │                      │
//!        └──configure(disabled)──▶ Disabled ─────────────┘
//! ```
//!
//! The lock around the shared state is only held for synchronous work
//! (append, drain, trim, reconfigure), never across a sender call.

use super::{
    config::ShipperConfig,
    error::{LoggerError, Result},
    line_buffer::LineBuffer,
    log_context::LogContext,
    log_level::{LevelFilter, LogLevel},
    log_record::LogRecord,
    logger::Logger,
    metrics::LoggerMetrics,
    payload::Payload,
    scheduler::FlushScheduler,
    sender::LogSender,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

/// Callback invoked for every non-fatal condition the shipper reports
///
/// Called with invalid level names, degraded-mode overflow and delivery
/// failures. It runs outside the shipper's lock, so it may log through
/// the same shipper.
pub type DiagnosticCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Dropped-line count between repeated overflow alerts on stderr
const OVERFLOW_ALERT_EVERY: u64 = 1000;

/// Lifecycle of a shipper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipperState {
    /// Lines are buffered but only trimmed, never delivered
    Unconfigured,
    /// A sender is set and the periodic trigger is armed
    Configured,
    /// Emits are no-ops and nothing is buffered
    Disabled,
}

impl fmt::Display for ShipperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipperState::Unconfigured => write!(f, "Unconfigured"),
            ShipperState::Configured => write!(f, "Configured"),
            ShipperState::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Sender plus the runtime it was configured on
///
/// Detached deliveries prefer the caller's runtime and fall back to this one.
#[derive(Clone)]
struct Delivery {
    sender: Arc<dyn LogSender>,
    runtime: Handle,
}

struct Inner {
    state: ShipperState,
    buffer: LineBuffer,
    filter: LevelFilter,
    request_fields: LogContext,
    delivery: Option<Delivery>,
    scheduler: FlushScheduler,
}

struct Shared {
    inner: Mutex<Inner>,
    metrics: LoggerMetrics,
    on_diagnostic: RwLock<Option<DiagnosticCallback>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let unsent = self.inner.get_mut().buffer.len();
        if unsent > 0 {
            eprintln!(
                "[LOGGER WARNING] Log shipper dropped with {} unsent lines. \
                 Call flush() before shutdown to deliver them.",
                unsent
            );
        }
    }
}

/// Outcome of taking lines out of the buffer
enum Drained {
    Empty,
    /// No sender: the buffer was trimmed to capacity
    Trimmed { dropped: usize, dropped_before: u64 },
    Ready { delivery: Delivery, payload: Payload },
}

/// Handle to a log buffering and delivery pipeline
#[derive(Clone)]
pub struct LogShipper {
    shared: Arc<Shared>,
}

static GLOBAL: OnceLock<LogShipper> = OnceLock::new();

impl LogShipper {
    /// Create an independent, unconfigured shipper
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ShipperState::Unconfigured,
                    buffer: LineBuffer::default(),
                    filter: LevelFilter::new(),
                    request_fields: LogContext::new(),
                    delivery: None,
                    scheduler: FlushScheduler::new(),
                }),
                metrics: LoggerMetrics::new(),
                on_diagnostic: RwLock::new(None),
            }),
        }
    }

    /// The process-wide shipper, created unconfigured on first use
    pub fn global() -> &'static LogShipper {
        GLOBAL.get_or_init(LogShipper::new)
    }

    /// Apply a configuration, replacing the previous one wholesale
    ///
    /// With `disabled` set, pending lines are discarded, the sender is
    /// cleared and the periodic trigger is cancelled. Otherwise a sender is
    /// installed (the given one or an HTTP sender for `endpoint`) and the
    /// trigger is re-armed on the current tokio runtime.
    ///
    /// An invalid level is reported as a diagnostic and the previous
    /// threshold kept. Errors are returned only when no sender can be
    /// built or no runtime is available; the previous configuration then
    /// stays in effect.
    pub fn configure(&self, config: ShipperConfig) -> Result<()> {
        if config.disabled {
            let mut inner = self.shared.inner.lock();
            inner.state = ShipperState::Disabled;
            inner.request_fields = LogContext::new();
            inner.delivery = None;
            inner.buffer.clear();
            inner.scheduler.disarm();
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|_| LoggerError::NoRuntime)?;
        let sender = match config.sender.clone() {
            Some(sender) => sender,
            None => default_sender(&config)?,
        };

        let level_result = {
            let mut inner = self.shared.inner.lock();
            let level_result = inner.filter.configure(config.level.as_deref());
            inner.request_fields = config.request_fields.clone();
            inner.buffer.set_capacity(config.effective_line_buffer());
            inner.delivery = Some(Delivery {
                sender,
                runtime: runtime.clone(),
            });
            inner.state = ShipperState::Configured;
            self.arm_locked(&mut inner, &runtime, config.effective_interval());
            level_result
        };

        if let Err(e) = level_result {
            self.report(&e);
        }
        Ok(())
    }

    fn arm_locked(&self, inner: &mut Inner, runtime: &Handle, period: Duration) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        inner.scheduler.arm(runtime, period, move || {
            // the send runs as its own task so disarming never cancels it
            let flow = match weak.upgrade() {
                Some(shared) => {
                    let shipper = LogShipper { shared };
                    shipper.dispatch(shipper.take_pending());
                    ControlFlow::Continue(())
                }
                None => ControlFlow::Break(()),
            };
            std::future::ready(flow)
        });
    }

    /// Drain pending lines and deliver them
    ///
    /// Resolves immediately when nothing is pending. Without a sender the
    /// buffer is only trimmed to capacity. With a sender, the lines are
    /// removed from the buffer before the call, so a failed delivery loses
    /// them; the failure is reported and returned.
    pub async fn flush(&self) -> Result<()> {
        match self.take_pending() {
            Drained::Empty => Ok(()),
            Drained::Trimmed {
                dropped,
                dropped_before,
            } => {
                self.report_overflow(dropped, dropped_before);
                Ok(())
            }
            Drained::Ready { delivery, payload } => {
                InFlight::new(self.clone(), &delivery.sender, payload.len())
                    .send(delivery.sender, payload)
                    .await
            }
        }
    }

    /// Create a named logger whose records carry `fields` in their context
    pub fn create_logger(&self, name: impl Into<String>, fields: LogContext) -> Logger {
        Logger::new(self.clone(), name, fields)
    }

    pub fn state(&self) -> ShipperState {
        self.shared.inner.lock().state
    }

    /// Number of lines waiting for the next flush
    pub fn pending_len(&self) -> usize {
        self.shared.inner.lock().buffer.len()
    }

    /// Copy of the lines waiting for the next flush, oldest first
    pub fn pending_lines(&self) -> Vec<LogRecord> {
        self.shared.inner.lock().buffer.iter().cloned().collect()
    }

    pub fn line_buffer_capacity(&self) -> usize {
        self.shared.inner.lock().buffer.capacity()
    }

    /// Current level threshold ordinal (0 lets everything through)
    pub fn level_threshold(&self) -> u8 {
        self.shared.inner.lock().filter.threshold()
    }

    pub fn request_fields(&self) -> LogContext {
        self.shared.inner.lock().request_fields.clone()
    }

    /// Period of the armed trigger, if any
    pub fn flush_interval(&self) -> Option<Duration> {
        let inner = self.shared.inner.lock();
        if inner.scheduler.is_armed() {
            inner.scheduler.period()
        } else {
            None
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn set_diagnostic_callback(&self, callback: DiagnosticCallback) {
        *self.shared.on_diagnostic.write() = Some(callback);
    }

    pub fn clear_diagnostic_callback(&self) {
        *self.shared.on_diagnostic.write() = None;
    }

    /// Whether a record at `level` would currently be buffered
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        let inner = self.shared.inner.lock();
        inner.state != ShipperState::Disabled && inner.filter.should_emit(level)
    }

    /// Gate, build and buffer one record
    ///
    /// `build` only runs when the level passes and logging is enabled.
    /// Reaching capacity drains the buffer before returning and spawns the
    /// delivery, so the caller never waits on the sender.
    pub(crate) fn emit<F>(&self, level: LogLevel, build: F)
    where
        F: FnOnce() -> LogRecord,
    {
        let drained = {
            let mut inner = self.shared.inner.lock();
            if inner.state == ShipperState::Disabled || !inner.filter.should_emit(level) {
                return;
            }
            let full = inner.buffer.append(build());
            self.shared.metrics.record_logged();
            if !full {
                return;
            }
            Self::take_locked(&mut inner, &self.shared.metrics)
        };

        self.dispatch(drained);
    }

    /// Act on drained lines without waiting for the sender
    ///
    /// The send is spawned on the calling runtime, or on the configured one
    /// when called from outside tokio. A send that never completes, e.g.
    /// because that runtime has shut down, is reported as lost.
    fn dispatch(&self, drained: Drained) {
        match drained {
            Drained::Empty => {}
            Drained::Trimmed {
                dropped,
                dropped_before,
            } => self.report_overflow(dropped, dropped_before),
            Drained::Ready { delivery, payload } => {
                let runtime = Handle::try_current().unwrap_or_else(|_| delivery.runtime.clone());
                let in_flight = InFlight::new(self.clone(), &delivery.sender, payload.len());
                runtime.spawn(async move {
                    // failures were already reported
                    let _ = in_flight.send(delivery.sender, payload).await;
                });
            }
        }
    }

    fn take_pending(&self) -> Drained {
        let mut inner = self.shared.inner.lock();
        Self::take_locked(&mut inner, &self.shared.metrics)
    }

    fn take_locked(inner: &mut Inner, metrics: &LoggerMetrics) -> Drained {
        if inner.buffer.is_empty() {
            return Drained::Empty;
        }

        match inner.delivery.clone() {
            None => {
                let dropped = inner.buffer.retain_newest();
                let dropped_before = metrics.record_dropped(dropped);
                Drained::Trimmed {
                    dropped,
                    dropped_before,
                }
            }
            Some(delivery) => {
                let lines = inner.buffer.drain_all();
                Drained::Ready {
                    delivery,
                    payload: Payload::new(&inner.request_fields, lines),
                }
            }
        }
    }

    fn report_overflow(&self, dropped: usize, dropped_before: u64) {
        if dropped == 0 {
            return;
        }
        let err = LoggerError::queue_overflow(dropped);

        // Alert on first drop and periodically thereafter
        let dropped_after = dropped_before + dropped as u64;
        let should_alert = dropped_before == 0
            || dropped_before / OVERFLOW_ALERT_EVERY != dropped_after / OVERFLOW_ALERT_EVERY;
        if should_alert {
            eprintln!(
                "[LOGGER WARNING] {} ({} dropped in total)",
                err, dropped_after
            );
        }
        self.notify(&err);
    }

    fn report(&self, err: &LoggerError) {
        match err {
            LoggerError::DeliveryFailed { .. } => eprintln!("[LOGGER ERROR] {}", err),
            _ => eprintln!("[LOGGER WARNING] {}", err),
        }
        self.notify(err);
    }

    fn notify(&self, err: &LoggerError) {
        let callback = self.shared.on_diagnostic.read().clone();
        if let Some(callback) = callback {
            callback(err);
        }
    }
}

/// Drained lines on their way to a sender
///
/// Dropped before the send settles (task never polled, runtime shut down,
/// caller stopped awaiting), the lines are counted and reported as lost.
struct InFlight {
    shipper: LogShipper,
    sender_name: String,
    lines: usize,
    settled: bool,
}

impl InFlight {
    fn new(shipper: LogShipper, sender: &Arc<dyn LogSender>, lines: usize) -> Self {
        Self {
            shipper,
            sender_name: sender.name().to_string(),
            lines,
            settled: false,
        }
    }

    async fn send(mut self, sender: Arc<dyn LogSender>, payload: Payload) -> Result<()> {
        let metrics = &self.shipper.shared.metrics;
        metrics.record_flush();

        let result = sender.send_logs(payload).await;
        self.settled = true;
        match result {
            Ok(()) => {
                metrics.record_delivered(self.lines);
                Ok(())
            }
            Err(e) => {
                metrics.record_delivery_failure(self.lines);
                self.shipper
                    .report(&LoggerError::delivery(&self.sender_name, e.to_string()));
                Err(e)
            }
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.shipper.shared.metrics.record_delivery_failure(self.lines);
        self.shipper.report(&LoggerError::delivery(
            &self.sender_name,
            format!("{} lines lost before the send completed", self.lines),
        ));
    }
}

impl Default for LogShipper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogShipper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("LogShipper")
            .field("state", &inner.state)
            .field("pending", &inner.buffer.len())
            .field("capacity", &inner.buffer.capacity())
            .field("threshold", &inner.filter.threshold())
            .finish()
    }
}

#[cfg(feature = "http")]
fn default_sender(config: &ShipperConfig) -> Result<Arc<dyn LogSender>> {
    Ok(Arc::new(crate::senders::HttpSender::from_config(config)?))
}

#[cfg(not(feature = "http"))]
fn default_sender(_config: &ShipperConfig) -> Result<Arc<dyn LogSender>> {
    Err(LoggerError::config(
        "sender",
        "no sender given and the `http` feature is disabled",
    ))
}

/// Configure the process-wide shipper
pub fn configure(config: ShipperConfig) -> Result<()> {
    LogShipper::global().configure(config)
}

/// Create a logger bound to the process-wide shipper
pub fn create_logger(name: impl Into<String>, fields: LogContext) -> Logger {
    LogShipper::global().create_logger(name, fields)
}

/// Flush the process-wide shipper, e.g. before shutdown
pub async fn flush() -> Result<()> {
    LogShipper::global().flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FnSender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    fn capturing() -> (
        FnSender<impl Fn(Payload) -> std::future::Ready<Result<()>>>,
        mpsc::UnboundedReceiver<Payload>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = FnSender::new(move |payload| {
            let _ = tx.send(payload);
            std::future::ready(Ok(()))
        });
        (sender, rx)
    }

    fn events(payload: &Payload) -> Vec<&str> {
        payload.lines().iter().map(|r| r.event.as_str()).collect()
    }

    #[test]
    fn test_new_shipper_is_unconfigured() {
        let shipper = LogShipper::new();
        assert_eq!(shipper.state(), ShipperState::Unconfigured);
        assert_eq!(shipper.pending_len(), 0);
        assert_eq!(shipper.line_buffer_capacity(), 50);
        assert_eq!(shipper.level_threshold(), 0);
        assert_eq!(shipper.flush_interval(), None);
    }

    #[test]
    fn test_configure_outside_runtime_fails() {
        let shipper = LogShipper::new();
        let (sender, _rx) = capturing();
        let result = shipper.configure(ShipperConfig::builder().sender(sender).build());

        assert!(matches!(result, Err(LoggerError::NoRuntime)));
        assert_eq!(shipper.state(), ShipperState::Unconfigured);
    }

    #[test]
    fn test_disable_works_without_runtime() {
        let shipper = LogShipper::new();
        let logger = shipper.create_logger("app", LogContext::new());
        logger.info("queued");

        shipper
            .configure(ShipperConfig::builder().disabled(true).build())
            .unwrap();
        assert_eq!(shipper.state(), ShipperState::Disabled);
        assert_eq!(shipper.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_flush_empty_is_noop() {
        let shipper = LogShipper::new();
        let (sender, mut rx) = capturing();
        shipper
            .configure(ShipperConfig::builder().sender(sender).build())
            .unwrap();

        shipper.flush().await.unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(shipper.metrics().flush_count(), 0);
    }

    #[tokio::test]
    async fn test_manual_flush_delivers_in_order_with_request_fields() {
        let shipper = LogShipper::new();
        let (sender, mut rx) = capturing();
        shipper
            .configure(
                ShipperConfig::builder()
                    .sender(sender)
                    .request_field("application", "myapp-client")
                    .build(),
            )
            .unwrap();

        let logger = shipper.create_logger("app", LogContext::new());
        logger.info("one");
        logger.warn("two");
        logger.error("three");
        shipper.flush().await.unwrap();

        let payload = rx.recv().await.unwrap();
        assert_eq!(events(&payload), vec!["one", "two", "three"]);
        assert_eq!(
            payload.request_fields().get("application"),
            Some(&crate::core::FieldValue::from("myapp-client"))
        );
        assert_eq!(shipper.pending_len(), 0);
        assert_eq!(shipper.metrics().delivered_count(), 3);
    }

    #[tokio::test]
    async fn test_capacity_drains_synchronously() {
        let shipper = LogShipper::new();
        let (sender, mut rx) = capturing();
        shipper
            .configure(
                ShipperConfig::builder()
                    .sender(sender)
                    .line_buffer(3)
                    .interval(Duration::from_secs(3600))
                    .build(),
            )
            .unwrap();

        let logger = shipper.create_logger("app", LogContext::new());
        logger.info("a");
        logger.info("b");
        assert_eq!(shipper.pending_len(), 2);
        logger.info("c");
        assert_eq!(shipper.pending_len(), 0);

        let payload = rx.recv().await.unwrap();
        assert_eq!(events(&payload), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_degraded_mode_keeps_newest() {
        let shipper = LogShipper::new();
        let dropped = Arc::new(AtomicUsize::new(0));
        let dropped_clone = Arc::clone(&dropped);
        shipper.set_diagnostic_callback(Arc::new(move |err| {
            if let LoggerError::QueueOverflow { dropped_count } = err {
                dropped_clone.fetch_add(*dropped_count, Ordering::SeqCst);
            }
        }));

        let logger = shipper.create_logger("app", LogContext::new());
        for i in 0..53 {
            logger.info(format!("line {}", i));
        }

        assert_eq!(shipper.pending_len(), 50);
        assert_eq!(dropped.load(Ordering::SeqCst), 3);
        assert_eq!(shipper.metrics().dropped_count(), 3);
        let pending = shipper.pending_lines();
        assert_eq!(pending[0].event, "line 3");
        assert_eq!(pending[49].event, "line 52");
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_flush() {
        let shipper = LogShipper::new();
        let (sender, mut rx) = capturing();
        shipper
            .configure(
                ShipperConfig::builder()
                    .sender(sender)
                    .interval(Duration::from_millis(500))
                    .build(),
            )
            .unwrap();
        assert_eq!(shipper.flush_interval(), Some(Duration::from_millis(500)));

        shipper.create_logger("tick", LogContext::new()).info("hello");
        tokio::time::sleep(Duration::from_millis(600)).await;

        let payload = rx.try_recv().unwrap();
        assert_eq!(events(&payload), vec!["hello"]);
        assert_eq!(shipper.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loggers_keep_trigger_alive() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let delivered_clone = Arc::clone(&delivered);
        let shipper = LogShipper::new();
        shipper
            .configure(
                ShipperConfig::builder()
                    .sender(FnSender::new(move |payload| {
                        delivered_clone.fetch_add(payload.len(), Ordering::SeqCst);
                        std::future::ready(Ok(()))
                    }))
                    .interval(Duration::from_millis(100))
                    .build(),
            )
            .unwrap();

        let logger = shipper.create_logger("app", LogContext::new());
        drop(shipper);
        logger.info("still shipped");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }
}
