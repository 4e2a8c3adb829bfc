//! Timestamp ordered buffer between the formatter threads and the drain worker
//!
//! Many formatter threads race to insert rendered records. Ordering by the
//! capture timestamp, which is taken on the caller's thread before any
//! formatting happens, lets the drain worker see records in chronological
//! order regardless of how long each one took to format.

use super::record::LogRecord;
use parking_lot::{Condvar, Mutex};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::time::Duration;

/// Min-heap of rendered records keyed by (timestamp, sequence).
#[derive(Debug, Default)]
pub struct OrderingBuffer {
    heap: BinaryHeap<Reverse<LogRecord>>,
}

impl OrderingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: LogRecord) {
        self.heap.push(Reverse(record));
    }

    /// The earliest record, if any.
    pub fn peek(&self) -> Option<&LogRecord> {
        self.heap.peek().map(|Reverse(record)| record)
    }

    /// Remove and return the earliest record.
    pub fn pop(&mut self) -> Option<LogRecord> {
        self.heap.pop().map(|Reverse(record)| record)
    }

    /// Move the whole content out, leaving this buffer empty.
    pub fn swap_out(&mut self) -> OrderingBuffer {
        std::mem::take(self)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Yields records in ascending (timestamp, sequence) order.
impl Iterator for OrderingBuffer {
    type Item = LogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

#[derive(Debug, Default)]
struct BufferState {
    /// Ready for the drain worker: always a contiguous run of sequences
    records: OrderingBuffer,
    /// Rendered ahead of an earlier sequence that is still being formatted;
    /// `None` marks a sequence whose rendering failed
    held: BTreeMap<u64, Option<LogRecord>>,
    /// Lowest sequence not yet settled
    next_sequence: u64,
    closed: bool,
}

/// The ordering buffer together with its lock and wake-up signal.
///
/// Formatter threads finish in any order, so a record is only released to
/// the drain worker once every record with a lower sequence number has
/// been settled. A batch the drain worker detaches therefore never
/// precedes a record it has yet to see.
///
/// The buffer content is only ever touched while the lock is held.
#[derive(Debug, Default)]
pub(crate) struct SharedBuffer {
    state: Mutex<BufferState>,
    ready: Condvar,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rendered record and wake the drain worker.
    pub fn push(&self, record: LogRecord) {
        self.settle(record.sequence(), Some(record));
    }

    /// Give up on a sequence number whose record could not be rendered.
    pub fn skip(&self, sequence: u64) {
        self.settle(sequence, None);
    }

    fn settle(&self, sequence: u64, record: Option<LogRecord>) {
        let released = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.held.insert(sequence, record);

            let mut released = false;
            while let Some(settled) = state.held.remove(&state.next_sequence) {
                if let Some(record) = settled {
                    state.records.insert(record);
                    released = true;
                }
                state.next_sequence += 1;
            }
            released
        };

        if released {
            self.ready.notify_one();
        }
    }

    /// Mark the buffer closed. The drain worker exits once it finds the
    /// buffer both closed and empty.
    pub fn close(&self) {
        // Set under the lock so a worker about to wait cannot miss the wake-up
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    /// Wait up to `timeout` for records and detach everything released.
    ///
    /// Returns `None` once the buffer is closed and drained. The lock is
    /// released before returning, so producers never wait on dispatch.
    pub fn next_batch(&self, timeout: Duration) -> Option<OrderingBuffer> {
        let mut state = self.state.lock();

        if state.records.is_empty() {
            if state.closed {
                return None;
            }
            // Timeouts and spurious wake-ups both fall through to an empty batch
            let _ = self.ready.wait_for(&mut state, timeout);
        }

        Some(state.records.swap_out())
    }

    /// Records released to the drain worker but not yet detached
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Records waiting for an earlier sequence to settle
    #[cfg(test)]
    pub fn held(&self) -> usize {
        self.state.lock().held.len()
    }
}
