//! Named collection of log destinations
//!
//! Entries keep their insertion order so that fan-out is deterministic.
//! Lookups are linear scans and resolve to the first entry with a matching
//! name; entries are never removed, only disabled.
//!
//! Enabling and disabling take effect at a sequence number, the one the
//! next `log` call would receive, rather than at dispatch time. A record
//! logged while an entry was disabled is never written to it, even when
//! the drain worker only gets to the record after the entry is enabled
//! again.

use super::{destination::Destination, error::LoggerError, metrics::LoggerMetrics};
use super::{priority::Priority, record::LogRecord};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub struct DestinationEntry {
    name: String,
    destination: Box<dyn Destination>,
    threshold: Priority,
    /// First sequence number of the current enabled window
    enabled_since: u64,
    /// First sequence number logged after the entry was disabled
    disabled_from: Option<u64>,
}

impl DestinationEntry {
    pub fn new(name: impl Into<String>, threshold: Priority, destination: Box<dyn Destination>) -> Self {
        Self {
            name: name.into(),
            destination,
            threshold,
            enabled_since: 0,
            disabled_from: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Priority {
        self.threshold
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled_from.is_none()
    }

    /// Enable or disable the entry for records numbered `sequence` onwards.
    ///
    /// Enabling an enabled entry, or disabling a disabled one, changes
    /// nothing. Records from before a disable that are still undelivered
    /// when the entry is enabled again are not written to it.
    pub fn set_enabled_from(&mut self, enabled: bool, sequence: u64) {
        match (enabled, self.disabled_from) {
            (true, Some(_)) => {
                self.enabled_since = sequence;
                self.disabled_from = None;
            }
            (false, None) => self.disabled_from = Some(sequence),
            _ => {}
        }
    }

    /// Returns true if this entry should receive `record`.
    pub fn accepts(&self, record: &LogRecord) -> bool {
        let sequence = record.sequence();
        sequence >= self.enabled_since
            && self.disabled_from.map_or(true, |end| sequence < end)
            && record.priority().passes(self.threshold)
    }
}

impl std::fmt::Debug for DestinationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationEntry")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("enabled_since", &self.enabled_since)
            .field("disabled_from", &self.disabled_from)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct DestinationRegistry {
    entries: Vec<DestinationEntry>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: DestinationEntry) {
        self.entries.push(entry);
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut DestinationEntry> {
        self.entries.iter_mut().find(|entry| entry.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&DestinationEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Enable or disable `name` from `sequence` onwards. Unknown names
    /// are ignored.
    pub fn set_enabled(&mut self, name: &str, enabled: bool, sequence: u64) {
        if let Some(entry) = self.find_mut(name) {
            entry.set_enabled_from(enabled, sequence);
        }
    }

    /// Unknown names are ignored.
    pub fn set_threshold(&mut self, name: &str, threshold: Priority) {
        if let Some(entry) = self.find_mut(name) {
            entry.threshold = threshold;
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.find(name).is_some_and(DestinationEntry::is_enabled)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write one record to every entry that accepts it.
    ///
    /// **Per-destination isolation**: each write is wrapped in `catch_unwind`,
    /// so a destination that fails or panics does not keep the record from
    /// the entries after it.
    pub fn dispatch(&mut self, record: &LogRecord, metrics: &LoggerMetrics) {
        for entry in self.entries.iter_mut().filter(|entry| entry.accepts(record)) {
            let result = catch_unwind(AssertUnwindSafe(|| entry.destination.write(record.line())));

            match result {
                Ok(Ok(())) => {
                    metrics.record_write();
                }
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Destination '{}' failed: {}", entry.name, e);
                    metrics.record_write_failure();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Destination '{}' panicked: {}. \
                         Other destinations continue to function.",
                        entry.name,
                        panic_message(panic_info.as_ref())
                    );
                    metrics.record_write_failure();
                }
            }
        }
    }

    /// Flush every destination in registration order, disabled ones included.
    ///
    /// All destinations are attempted; the first failure is returned.
    pub fn flush_all(&mut self) -> Result<(), LoggerError> {
        let mut first_error = None;

        for entry in &mut self.entries {
            let result = catch_unwind(AssertUnwindSafe(|| entry.destination.flush()));

            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(panic_info) => LoggerError::writer(format!(
                    "destination '{}' panicked during flush: {}",
                    entry.name,
                    panic_message(panic_info.as_ref())
                )),
            };

            eprintln!("[LOGGER ERROR] Destination '{}' flush failed: {}", entry.name, error);
            first_error.get_or_insert(error);
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub(crate) fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<String>>>);

    impl Destination for Capture {
        fn write(&mut self, line: &str) -> Result<()> {
            self.0.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct Panicking;

    impl Destination for Panicking {
        fn write(&mut self, _line: &str) -> Result<()> {
            panic!("disk on fire");
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("cannot flush"))
        }
    }

    fn record(priority: Priority) -> LogRecord {
        LogRecord::new(Utc::now(), 0, priority, format!("{}\n", priority))
    }

    #[test]
    fn test_dispatch_respects_threshold_and_enabled() {
        let low = Capture::default();
        let high = Capture::default();
        let off = Capture::default();

        let mut registry = DestinationRegistry::new();
        registry.add(DestinationEntry::new("low", Priority::Debug, Box::new(low.clone())));
        registry.add(DestinationEntry::new("high", Priority::Error, Box::new(high.clone())));
        registry.add(DestinationEntry::new("off", Priority::Debug, Box::new(off.clone())));
        registry.set_enabled("off", false, 0);

        let metrics = LoggerMetrics::new();
        registry.dispatch(&record(Priority::Info), &metrics);
        registry.dispatch(&record(Priority::Error), &metrics);

        assert_eq!(low.0.lock().len(), 2);
        assert_eq!(*high.0.lock(), vec!["Error\n".to_string()]);
        assert!(off.0.lock().is_empty());
        assert_eq!(metrics.writes(), 3);
    }

    #[test]
    fn test_enabled_window_follows_sequence_numbers() {
        let capture = Capture::default();
        let mut entry = DestinationEntry::new("window", Priority::Debug, Box::new(capture));
        let at = |sequence| LogRecord::new(Utc::now(), sequence, Priority::Info, String::new());

        entry.set_enabled_from(false, 3);
        assert!(!entry.is_enabled());
        assert!(entry.accepts(&at(2)));
        assert!(!entry.accepts(&at(3)));

        // Logged while disabled, dispatched after enabling again
        entry.set_enabled_from(true, 5);
        assert!(entry.is_enabled());
        assert!(!entry.accepts(&at(4)));
        assert!(entry.accepts(&at(5)));

        // Repeating the current state keeps the window
        entry.set_enabled_from(true, 9);
        assert!(entry.accepts(&at(6)));
    }

    #[test]
    fn test_first_matching_name_wins() {
        let mut registry = DestinationRegistry::new();
        registry.add(DestinationEntry::new("dup", Priority::Info, Box::new(Capture::default())));
        registry.add(DestinationEntry::new("dup", Priority::Info, Box::new(Capture::default())));

        registry.set_threshold("dup", Priority::Critical);

        assert_eq!(registry.find("dup").map(DestinationEntry::threshold), Some(Priority::Critical));
        assert_eq!(registry.entries[1].threshold(), Priority::Info);
    }

    #[test]
    fn test_unknown_name_is_noop() {
        let mut registry = DestinationRegistry::new();
        registry.set_enabled("missing", true, 0);
        registry.set_threshold("missing", Priority::Debug);

        assert!(!registry.is_enabled("missing"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_panicking_destination_is_isolated() {
        let after = Capture::default();

        let mut registry = DestinationRegistry::new();
        registry.add(DestinationEntry::new("broken", Priority::Debug, Box::new(Panicking)));
        registry.add(DestinationEntry::new("after", Priority::Debug, Box::new(after.clone())));

        let metrics = LoggerMetrics::new();
        registry.dispatch(&record(Priority::Warning), &metrics);

        assert_eq!(after.0.lock().len(), 1);
        assert_eq!(metrics.write_failures(), 1);
        assert_eq!(metrics.writes(), 1);
    }

    #[test]
    fn test_flush_all_reports_first_failure() {
        let mut registry = DestinationRegistry::new();
        registry.add(DestinationEntry::new("ok", Priority::Debug, Box::new(Capture::default())));
        registry.add(DestinationEntry::new("broken", Priority::Debug, Box::new(Panicking)));

        let err = registry.flush_all().expect_err("broken destination must fail");
        assert!(err.to_string().contains("cannot flush"));
    }
}
