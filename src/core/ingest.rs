//! Formatter threads rendering accepted records
//!
//! `Logger::log` never formats on the caller's thread. It hands a
//! [`PendingRecord`] to a fixed pool of formatter threads over an unbounded
//! channel; each formatter renders the line, inserts it into the ordering
//! buffer and wakes the drain worker. A record that fails to render still
//! settles its sequence number so later records are not held back.
//!
//! The channel has no capacity limit, so a burst of log calls is queued
//! in memory rather than slowing the callers down.

use super::{
    buffer::SharedBuffer,
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    record::PendingRecord,
    registry::panic_message,
};
use crossbeam_channel::Receiver;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub(crate) struct FormatterPool {
    handles: Vec<JoinHandle<()>>,
}

impl FormatterPool {
    /// Start `threads` formatters. They run until every sender of the
    /// channel is dropped and the queued records are rendered.
    pub fn spawn(
        threads: usize,
        receiver: Receiver<PendingRecord>,
        buffer: Arc<SharedBuffer>,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        let mut handles = Vec::with_capacity(threads);

        for idx in 0..threads {
            let receiver = receiver.clone();
            let buffer = Arc::clone(&buffer);
            let metrics = Arc::clone(&metrics);

            let handle = thread::Builder::new()
                .name(format!("multi-logger-fmt-{}", idx))
                .spawn(move || Self::run(&receiver, &buffer, &metrics))
                .map_err(|e| LoggerError::thread_spawn("formatter", e))?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    fn run(receiver: &Receiver<PendingRecord>, buffer: &SharedBuffer, metrics: &LoggerMetrics) {
        for pending in receiver.iter() {
            let sequence = pending.sequence;

            // A failure only costs this one record
            match catch_unwind(AssertUnwindSafe(|| pending.render())) {
                Ok(record) => buffer.push(record),
                Err(panic_info) => {
                    buffer.skip(sequence);
                    metrics.record_format_failure();
                    eprintln!(
                        "[LOGGER ERROR] Failed to format log record: {}",
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
    }

    /// Wait for every formatter to finish. The channel's senders must be
    /// dropped first or this never returns.
    pub fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Formatter thread panicked during shutdown: {:?}", e);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::priority::Priority;
    use crate::core::record::CallSite;
    use chrono::Utc;
    use std::time::Duration;

    fn pending(sequence: u64) -> PendingRecord {
        PendingRecord {
            timestamp: Utc::now(),
            sequence,
            priority: Priority::Info,
            message: format!("message {}", sequence),
            call_site: CallSite::new("pending", file!(), line!()),
            thread_id: "ThreadId(1)".into(),
            category: "test".into(),
        }
    }

    #[test]
    fn test_pool_renders_everything_before_join_returns() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let buffer = Arc::new(SharedBuffer::new());
        let metrics = Arc::new(LoggerMetrics::new());

        let pool = FormatterPool::spawn(3, receiver, Arc::clone(&buffer), Arc::clone(&metrics))
            .expect("spawn formatters");
        assert_eq!(pool.len(), 3);

        for sequence in 0..100 {
            sender.send(pending(sequence)).expect("formatters alive");
        }
        drop(sender);
        pool.join();

        let batch = buffer
            .next_batch(Duration::from_millis(1))
            .expect("buffer still open");
        let sequences: Vec<u64> = batch.map(|record| record.sequence()).collect();
        assert_eq!(sequences.len(), 100);
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(metrics.format_failures(), 0);
    }
}
