//! Logger metrics for observability
//!
//! Counters for the ingestion gate, the drain worker and the destinations.
//! The requested-error counter doubles as the value handed to the
//! verification callback at teardown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use multi_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_accepted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed the global threshold
    accepted: AtomicU64,

    /// Records rejected by the global threshold
    filtered: AtomicU64,

    /// Accepted records at or above the error threshold, counted only while
    /// a verification callback is registered
    requested_errors: AtomicU64,

    /// Records taken out of the ordering buffer by the drain worker
    dispatched: AtomicU64,

    /// Successful destination writes
    writes: AtomicU64,

    /// Destination writes that returned an error or panicked
    write_failures: AtomicU64,

    /// Records lost because rendering panicked
    format_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            requested_errors: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            format_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn requested_errors(&self) -> u64 {
        self.requested_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_failures(&self) -> u64 {
        self.format_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_requested_error(&self) -> u64 {
        self.requested_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write(&self) -> u64 {
        self.writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_failure(&self) -> u64 {
        self.format_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.requested_errors.store(0, Ordering::Relaxed);
        self.dispatched.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.format_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            filtered: AtomicU64::new(self.filtered()),
            requested_errors: AtomicU64::new(self.requested_errors()),
            dispatched: AtomicU64::new(self.dispatched()),
            writes: AtomicU64::new(self.writes()),
            write_failures: AtomicU64::new(self.write_failures()),
            format_failures: AtomicU64::new(self.format_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.accepted(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.requested_errors(), 0);
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.writes(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.format_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_requested_error(), 0);
        assert_eq!(metrics.record_requested_error(), 1);
        assert_eq!(metrics.requested_errors(), 2);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_accepted();
        metrics.record_write();
        metrics.record_write_failure();

        metrics.reset();

        assert_eq!(metrics.accepted(), 0);
        assert_eq!(metrics.writes(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dispatched();

        let snapshot = metrics.clone();
        metrics.record_dispatched();

        assert_eq!(metrics.dispatched(), 2);
        assert_eq!(snapshot.dispatched(), 1);
    }
}
