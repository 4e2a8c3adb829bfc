//! Process-wide logger for call sites without an explicit handle
//!
//! The global logger is created on first use with an `Info` threshold and
//! the `global` category. Statics are never dropped, so a program that
//! wants its destinations flushed and its verification callback run must
//! call [`shutdown_global`] before exiting.

use crate::core::{Logger, Priority, Result, DEFAULT_CATEGORY};
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, started on first call.
///
/// # Panics
///
/// Panics if the logger's threads cannot be started.
pub fn global_logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(|| match Logger::new(Priority::Info, DEFAULT_CATEGORY) {
        Ok(logger) => logger,
        Err(e) => panic!("failed to start global logger: {}", e),
    })
}

/// Shut the global logger down if it was ever started.
///
/// Afterwards the global logger ignores further messages.
pub fn shutdown_global() -> Result<()> {
    match GLOBAL_LOGGER.get() {
        Some(logger) => logger.shutdown(),
        None => Ok(()),
    }
}
