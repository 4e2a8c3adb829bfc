//! Log record structures
//!
//! A record starts life as a [`PendingRecord`], created on the caller's
//! thread with the capture timestamp already taken, and becomes a
//! [`LogRecord`] once a formatter thread renders its text line.

use super::priority::Priority;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::panic::Location;
use std::sync::Arc;

/// strftime layout of the leading timestamp: `Jan  8 10:30:45.123456789`
pub const TIMESTAMP_FORMAT: &str = "%b %e %T%.9f";

// Thread-local cache so the caller does not re-render its thread id on every call
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
pub(crate) fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()).into())
            .clone()
    })
}

/// Where a log call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// Call site of the caller, for entry points that cannot name the function.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            function: "-",
            file: location.file(),
            line: location.line(),
        }
    }
}

/// A record accepted by the ingestion gate but not yet rendered.
#[derive(Debug)]
pub(crate) struct PendingRecord {
    pub timestamp: DateTime<Utc>,
    pub sequence: u64,
    pub priority: Priority,
    pub message: String,
    pub call_site: CallSite,
    pub thread_id: Arc<str>,
    pub category: Arc<str>,
}

impl PendingRecord {
    /// Replaces newlines, carriage returns and tabs with escape sequences
    /// so a message can never span more than one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn render(self) -> LogRecord {
        let line = format!(
            "{} {} {} {} {}: {} ({}:{})\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.thread_id,
            self.category,
            self.call_site.function,
            self.priority,
            Self::sanitize_message(&self.message),
            self.call_site.file,
            self.call_site.line,
        );

        LogRecord {
            timestamp: self.timestamp,
            sequence: self.sequence,
            priority: self.priority,
            line,
        }
    }
}

/// A fully rendered record waiting in the ordering buffer.
///
/// Records order by capture timestamp, then by the sequence number handed
/// out together with the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: DateTime<Utc>,
    sequence: u64,
    priority: Priority,
    line: String,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Utc>, sequence: u64, priority: Priority, line: String) -> Self {
        Self {
            timestamp,
            sequence,
            priority,
            line,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The newline terminated text handed to destinations
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl Ord for LogRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for LogRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pending(message: &str) -> PendingRecord {
        PendingRecord {
            timestamp: Utc
                .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
                .single()
                .expect("valid datetime")
                + chrono::Duration::nanoseconds(1_234),
            sequence: 7,
            priority: Priority::Warning,
            message: message.to_string(),
            call_site: CallSite::new("connect", "src/net.rs", 42),
            thread_id: "ThreadId(3)".into(),
            category: "network".into(),
        }
    }

    #[test]
    fn test_render_line_format() {
        let record = pending("retrying").render();
        assert_eq!(
            record.line(),
            "Jan  8 10:30:45.000001234 ThreadId(3) network connect Warning: retrying (src/net.rs:42)\n"
        );
        assert_eq!(record.priority(), Priority::Warning);
        assert_eq!(record.sequence(), 7);
    }

    #[test]
    fn test_render_escapes_line_breaks() {
        let record = pending("first\nsecond\tthird\r").render();
        assert_eq!(record.line().lines().count(), 1);
        assert!(record.line().contains("first\\nsecond\\tthird\\r"));
    }

    #[test]
    fn test_order_by_timestamp_then_sequence() {
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::microseconds(1);

        let early = LogRecord::new(t0, 5, Priority::Info, String::new());
        let tie = LogRecord::new(t0, 6, Priority::Debug, String::new());
        let late = LogRecord::new(t1, 1, Priority::Info, String::new());

        assert!(early < tie);
        assert!(tie < late);
        assert!(early < late);
    }

    #[test]
    fn test_caller_location() {
        let site = CallSite::caller();
        assert!(site.file.ends_with("record.rs"));
        assert_eq!(site.function, "-");
    }

    #[test]
    fn test_thread_id_cached_per_thread() {
        let here = current_thread_id();
        assert_eq!(here, current_thread_id());

        let there = std::thread::spawn(current_thread_id).join().expect("thread panicked");
        assert_ne!(here, there);
    }
}
