//! Shipper metrics for observability
//!
//! Counters for accepted, dropped and delivered lines so hosts can tell
//! whether the buffer is sized correctly and the collector is reachable.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for shipper observability
///
/// # Example
///
/// ```
/// use log_shipper::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_logged();
/// metrics.record_dropped(1);
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted into the line buffer
    total_logged: AtomicU64,

    /// Records lost to degraded-mode overflow or failed delivery
    dropped_count: AtomicU64,

    /// Payloads handed to a sender
    flush_count: AtomicU64,

    /// Records in payloads the sender accepted
    delivered_count: AtomicU64,

    /// Payloads the sender rejected
    delivery_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
            delivered_count: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self, lines: usize) -> u64 {
        self.dropped_count.fetch_add(lines as u64, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flush_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self, lines: usize) -> u64 {
        self.delivered_count.fetch_add(lines as u64, Ordering::Relaxed)
    }

    /// Record a rejected payload; its lines count as dropped
    #[inline]
    pub fn record_delivery_failure(&self, lines: usize) -> u64 {
        self.record_dropped(lines);
        self.delivery_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged.
    pub fn drop_rate(&self) -> f64 {
        let total = self.total_logged();
        if total == 0 {
            return 0.0;
        }
        (self.dropped_count() as f64 / total as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.flush_count.store(0, Ordering::Relaxed);
        self.delivered_count.store(0, Ordering::Relaxed);
        self.delivery_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.flush_count(), 0);
        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.delivery_failures(), 0);
    }

    #[test]
    fn test_delivery_failure_counts_lines_as_dropped() {
        let metrics = LoggerMetrics::new();
        metrics.record_delivery_failure(5);
        metrics.record_delivery_failure(2);

        assert_eq!(metrics.delivery_failures(), 2);
        assert_eq!(metrics.dropped_count(), 7);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_logged();
        }
        metrics.record_dropped(10);

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_flush();
        metrics.record_delivered(3);
        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.flush_count(), 0);
        assert_eq!(metrics.delivered_count(), 0);
    }
}
