//! The single background thread dispatching buffered records
//!
//! Each round the worker waits (bounded by the drain interval) for the
//! ordering buffer to fill, detaches its whole content, releases the buffer
//! lock and then, holding only the registry lock, writes the batch to the
//! destinations in ascending timestamp order. Being the only caller of
//! destination code, it serializes every write.

use super::{
    buffer::SharedBuffer,
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    registry::{panic_message, DestinationRegistry},
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub(crate) struct DrainWorker {
    handle: JoinHandle<()>,
}

impl DrainWorker {
    pub fn spawn(
        buffer: Arc<SharedBuffer>,
        registry: Arc<Mutex<DestinationRegistry>>,
        metrics: Arc<LoggerMetrics>,
        interval: Duration,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("multi-logger-drain".to_string())
            .spawn(move || Self::run(&buffer, &registry, &metrics, interval))
            .map_err(|e| LoggerError::thread_spawn("drain", e))?;

        Ok(Self { handle })
    }

    /// Runs until the buffer is closed and empty.
    fn run(
        buffer: &SharedBuffer,
        registry: &Mutex<DestinationRegistry>,
        metrics: &LoggerMetrics,
        interval: Duration,
    ) {
        while let Some(batch) = buffer.next_batch(interval) {
            if batch.is_empty() {
                continue;
            }

            let mut registry = registry.lock();
            for record in batch {
                metrics.record_dispatched();
                registry.dispatch(&record, metrics);
            }
        }
    }

    /// Wait for the worker to exit. The buffer must be closed first.
    pub fn join(self) -> Result<()> {
        self.handle.join().map_err(|panic_info| {
            let message = panic_message(panic_info.as_ref());
            eprintln!("[LOGGER ERROR] Drain worker panicked during shutdown: {}", message);
            LoggerError::other(format!("drain worker panicked: {}", message))
        })
    }
}
