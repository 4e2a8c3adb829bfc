//! Main logger implementation
//!
//! Three locks, never nested:
//!
//! - the ingestion state (category, thresholds, verification callback and
//!   the formatter channel), taken by every `log` call;
//! - the ordering buffer, taken by formatters to insert and by the drain
//!   worker to detach a batch;
//! - the destination registry, held by the drain worker for one batch of
//!   writes and briefly by the configuration methods.

use super::{
    buffer::SharedBuffer,
    config::LoggerConfig,
    destination::Destination,
    drain::DrainWorker,
    error::Result,
    ingest::FormatterPool,
    metrics::LoggerMetrics,
    priority::Priority,
    record::{current_thread_id, CallSite, PendingRecord},
    registry::{DestinationEntry, DestinationRegistry},
};
use crate::destinations::FileDestination;
use chrono::Utc;
use crossbeam_channel::{unbounded, Sender};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Teardown hook receiving the number of requested errors.
///
/// It runs once, after every destination has been flushed, so it may read
/// back what the destinations wrote. An `Err` is returned from
/// [`Logger::shutdown`].
pub type VerificationCallback = Box<dyn FnOnce(u64) -> Result<()> + Send>;

struct IngestState {
    category: Arc<str>,
    global_threshold: Priority,
    error_threshold: Priority,
    verification: Option<VerificationCallback>,
    /// `None` once shutdown has started
    sender: Option<Sender<PendingRecord>>,
    next_sequence: u64,
}

struct Workers {
    formatters: FormatterPool,
    drain: DrainWorker,
}

/// A logger writing every accepted message to all of its destinations in
/// the same chronological order.
///
/// All methods take `&self`; a `Logger` can be shared between threads
/// behind an `Arc` or used as a `static`.
///
/// # Example
///
/// ```
/// use multi_logger::prelude::*;
///
/// let logger = Logger::new(Priority::Debug, "example")?;
/// logger.add_destination("memory", MemoryDestination::new());
/// logger.info("started");
/// logger.shutdown()?;
/// # Ok::<(), multi_logger::LoggerError>(())
/// ```
pub struct Logger {
    state: Mutex<IngestState>,
    registry: Arc<Mutex<DestinationRegistry>>,
    buffer: Arc<SharedBuffer>,
    metrics: Arc<LoggerMetrics>,
    workers: Mutex<Option<Workers>>,
}

impl Logger {
    /// Create a logger with the given global threshold and category and
    /// default settings for everything else.
    pub fn new(global_threshold: Priority, category: impl Into<String>) -> Result<Self> {
        Self::from_config(LoggerConfig {
            global_threshold,
            category: category.into(),
            ..LoggerConfig::default()
        })
    }

    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let (sender, receiver) = unbounded();
        let buffer = Arc::new(SharedBuffer::new());
        let registry = Arc::new(Mutex::new(DestinationRegistry::new()));
        let metrics = Arc::new(LoggerMetrics::new());

        let formatters = FormatterPool::spawn(
            config.formatter_threads,
            receiver,
            Arc::clone(&buffer),
            Arc::clone(&metrics),
        )?;

        let drain = match DrainWorker::spawn(
            Arc::clone(&buffer),
            Arc::clone(&registry),
            Arc::clone(&metrics),
            config.drain_interval(),
        ) {
            Ok(drain) => drain,
            Err(e) => {
                drop(sender);
                formatters.join();
                return Err(e);
            }
        };

        Ok(Self {
            state: Mutex::new(IngestState {
                category: config.category.into(),
                global_threshold: config.global_threshold,
                error_threshold: config.error_threshold,
                verification: None,
                sender: Some(sender),
                next_sequence: 0,
            }),
            registry,
            buffer,
            metrics,
            workers: Mutex::new(Some(Workers { formatters, drain })),
        })
    }

    /// Log a message.
    ///
    /// Messages below the global threshold are dropped here. Otherwise the
    /// capture timestamp is taken on the caller's thread and rendering is
    /// handed to the formatter threads; this call never waits for
    /// destination I/O. The category is the one in effect at this call.
    pub fn log(&self, priority: Priority, message: impl Into<String>, call_site: CallSite) {
        let message = message.into();
        let thread_id = current_thread_id();

        let mut state = self.state.lock();
        if !priority.passes(state.global_threshold) {
            self.metrics.record_filtered();
            return;
        }
        if state.sender.is_none() {
            return;
        }

        if state.verification.is_some() && priority.passes(state.error_threshold) {
            self.metrics.record_requested_error();
        }
        self.metrics.record_accepted();

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let pending = PendingRecord {
            timestamp: Utc::now(),
            sequence,
            priority,
            message,
            call_site,
            thread_id,
            category: Arc::clone(&state.category),
        };

        if let Some(sender) = &state.sender {
            if sender.send(pending).is_err() {
                // Every formatter is gone; release the number so the buffer
                // does not hold later records back waiting for it
                self.buffer.skip(sequence);
                self.metrics.record_format_failure();
                eprintln!("[LOGGER ERROR] No formatter thread left, dropping log record {}", sequence);
            }
        }
    }

    /// Log at [`Priority::Debug`].
    ///
    /// File and line come from the caller, but a method cannot name the
    /// calling function, so the function field of the line is `-`. The
    /// [`debug!`](crate::debug) family of macros fills it in.
    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Priority::Debug, message, CallSite::caller());
    }

    /// Log at [`Priority::Info`].
    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Priority::Info, message, CallSite::caller());
    }

    /// Log at [`Priority::Warning`].
    #[inline]
    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Priority::Warning, message, CallSite::caller());
    }

    /// Log at [`Priority::Error`].
    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Priority::Error, message, CallSite::caller());
    }

    /// Log at [`Priority::Critical`].
    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Priority::Critical, message, CallSite::caller());
    }

    /// Change the category. Only records logged afterwards carry it.
    pub fn set_category(&self, category: impl Into<String>) {
        let category: String = category.into();
        self.state.lock().category = category.into();
    }

    pub fn category(&self) -> String {
        self.state.lock().category.to_string()
    }

    /// Register a destination with the current global threshold.
    pub fn add_destination<D>(&self, name: impl Into<String>, destination: D)
    where
        D: Destination + 'static,
    {
        let threshold = self.global_threshold();
        self.add_destination_with_threshold(name, threshold, destination);
    }

    /// Register a destination with its own threshold.
    ///
    /// The global threshold still applies first: a destination threshold
    /// below it has no effect.
    pub fn add_destination_with_threshold<D>(
        &self,
        name: impl Into<String>,
        threshold: Priority,
        destination: D,
    ) where
        D: Destination + 'static,
    {
        self.registry
            .lock()
            .add(DestinationEntry::new(name, threshold, Box::new(destination)));
    }

    /// Open `path` (truncating it) and register it with the current global
    /// threshold. Nothing is registered if the file cannot be opened.
    pub fn add_file_destination(&self, name: impl Into<String>, path: impl Into<PathBuf>) -> Result<()> {
        let destination = FileDestination::create(path)?;
        self.add_destination(name, destination);
        Ok(())
    }

    /// Enable or disable a destination. Unknown names are ignored.
    ///
    /// The change applies to messages logged after this call, whenever
    /// the drain worker gets to them. A message logged while the
    /// destination is disabled never reaches it.
    pub fn set_destination_enabled(&self, name: &str, enabled: bool) {
        // Read first so the state and registry locks are never held together
        let from = self.state.lock().next_sequence;
        self.registry.lock().set_enabled(name, enabled, from);
    }

    /// Change the ingestion gate. Destination thresholds are left alone.
    pub fn set_global_threshold(&self, threshold: Priority) {
        self.state.lock().global_threshold = threshold;
    }

    pub fn global_threshold(&self) -> Priority {
        self.state.lock().global_threshold
    }

    /// Change one destination's threshold. Unknown names are ignored.
    pub fn set_destination_threshold(&self, name: &str, threshold: Priority) {
        self.registry.lock().set_threshold(name, threshold);
    }

    pub fn destination_threshold(&self, name: &str) -> Option<Priority> {
        self.registry.lock().find(name).map(DestinationEntry::threshold)
    }

    /// Set the teardown hook, replacing any previous one.
    ///
    /// Requested errors are only counted while a hook is set.
    pub fn set_verification_callback<F>(&self, callback: F)
    where
        F: FnOnce(u64) -> Result<()> + Send + 'static,
    {
        self.state.lock().verification = Some(Box::new(callback));
    }

    /// Set the priority from which a logged message counts as an error.
    /// Defaults to [`Priority::Error`].
    pub fn set_error_threshold(&self, threshold: Priority) {
        self.state.lock().error_threshold = threshold;
    }

    pub fn error_threshold(&self) -> Priority {
        self.state.lock().error_threshold
    }

    /// Returns true if a message of `priority` passes the global threshold.
    pub fn is_logging(&self, priority: Priority) -> bool {
        priority.passes(self.state.lock().global_threshold)
    }

    /// Returns true if a destination named `name` exists and is enabled.
    pub fn is_destination_enabled(&self, name: &str) -> bool {
        self.registry.lock().is_enabled(name)
    }

    pub fn destination_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    /// Records rendered but not yet taken by the drain worker
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Snapshot of the counters. Resetting the snapshot leaves the
    /// logger's own counters, and the error count handed to the
    /// verification callback, untouched.
    pub fn metrics(&self) -> LoggerMetrics {
        (*self.metrics).clone()
    }

    /// Stop the logger and deliver everything it accepted.
    ///
    /// In order: stop accepting messages, let the formatters render what
    /// is queued, let the drain worker empty the buffer and exit, flush
    /// every destination, then run the verification callback with the
    /// requested error count.
    ///
    /// A verification failure takes precedence over a flush failure in the
    /// returned error. Calling this again is a no-op returning `Ok(())`.
    pub fn shutdown(&self) -> Result<()> {
        let Some(workers) = self.workers.lock().take() else {
            return Ok(());
        };

        let callback = {
            let mut state = self.state.lock();
            state.sender = None;
            state.verification.take()
        };

        workers.formatters.join();
        self.buffer.close();
        let drained = workers.drain.join();

        let flushed = self.registry.lock().flush_all();

        let verified = match callback {
            Some(callback) => callback(self.metrics.requested_errors()),
            None => Ok(()),
        };

        verified.and(drained).and(flushed)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Logger shutdown failed: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use multi_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .global_threshold(Priority::Debug)
///     .category("builder")
///     .destination("memory", MemoryDestination::new())
///     .destination_with_threshold("errors", Priority::Error, MemoryDestination::new())
///     .build()?;
///
/// assert_eq!(logger.destination_threshold("errors"), Some(Priority::Error));
/// # Ok::<(), multi_logger::LoggerError>(())
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    destinations: Vec<(String, Option<Priority>, Box<dyn Destination>)>,
    verification: Option<VerificationCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            destinations: Vec::new(),
            verification: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_threshold(mut self, threshold: Priority) -> Self {
        self.config.global_threshold = threshold;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.config.category = category.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_threshold(mut self, threshold: Priority) -> Self {
        self.config.error_threshold = threshold;
        self
    }

    /// Upper bound on how long the drain worker sleeps between batches.
    /// Rounded up to whole milliseconds; only zero is rejected by `build()`.
    #[must_use = "builder methods return a new value"]
    pub fn drain_interval(mut self, interval: Duration) -> Self {
        let millis = interval.as_nanos().div_ceil(1_000_000);
        self.config.drain_interval_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter_threads(mut self, threads: usize) -> Self {
        self.config.formatter_threads = threads;
        self
    }

    /// Add a destination using the global threshold in effect at `build()`
    #[must_use = "builder methods return a new value"]
    pub fn destination<D: Destination + 'static>(mut self, name: impl Into<String>, destination: D) -> Self {
        let destination: Box<dyn Destination> = Box::new(destination);
        self.destinations.push((name.into(), None, destination));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn destination_with_threshold<D: Destination + 'static>(
        mut self,
        name: impl Into<String>,
        threshold: Priority,
        destination: D,
    ) -> Self {
        let destination: Box<dyn Destination> = Box::new(destination);
        self.destinations.push((name.into(), Some(threshold), destination));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn verification_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(u64) -> Result<()> + Send + 'static,
    {
        self.verification = Some(Box::new(callback));
        self
    }

    /// Build the Logger and start its threads
    pub fn build(self) -> Result<Logger> {
        let global_threshold = self.config.global_threshold;
        let logger = Logger::from_config(self.config)?;

        {
            let mut registry = logger.registry.lock();
            for (name, threshold, destination) in self.destinations {
                let threshold = threshold.unwrap_or(global_threshold);
                registry.add(DestinationEntry::new(name, threshold, destination));
            }
        }

        if let Some(callback) = self.verification {
            logger.state.lock().verification = Some(callback);
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
