//! In-memory destination
//!
//! Keeps every line it receives. Clones share the same storage, so a test
//! (or a verification callback) can hand one clone to the logger and read
//! the lines back through another.

use crate::core::{Destination, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    flushes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    captured: Arc<Mutex<Captured>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far, newline included
    pub fn lines(&self) -> Vec<String> {
        self.captured.lock().lines.clone()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().lines.is_empty()
    }

    /// Number of times the logger flushed this destination
    pub fn flush_count(&self) -> usize {
        self.captured.lock().flushes
    }
}

impl Destination for MemoryDestination {
    fn write(&mut self, line: &str) -> Result<()> {
        self.captured.lock().lines.push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.captured.lock().flushes += 1;
        Ok(())
    }
}
