//! Logger configuration
//!
//! Every field has a default, so a configuration file only needs to name
//! what it changes:
//!
//! ```
//! use multi_logger::{LoggerConfig, Priority};
//!
//! let config = LoggerConfig::from_json_str(r#"{ "category": "tester", "global_threshold": "Debug" }"#)?;
//! assert_eq!(config.category, "tester");
//! assert_eq!(config.global_threshold, Priority::Debug);
//! assert_eq!(config.error_threshold, Priority::Error);
//! # Ok::<(), multi_logger::LoggerError>(())
//! ```

use super::{
    error::{LoggerError, Result},
    priority::Priority,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default category of a logger
pub const DEFAULT_CATEGORY: &str = "global";

/// Default upper bound on how long the drain worker sleeps between batches
pub const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_secs(1);

const MAX_DEFAULT_FORMATTER_THREADS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Messages below this priority are discarded at the call site
    pub global_threshold: Priority,

    /// Label written into every line
    pub category: String,

    /// Messages at or above this priority count towards the error total
    /// handed to the verification callback
    pub error_threshold: Priority,

    /// Maximum wait of the drain worker between batches, in milliseconds
    pub drain_interval_ms: u64,

    /// Number of threads rendering records
    pub formatter_threads: usize,
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.formatter_threads == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "formatter_threads must be at least 1",
            ));
        }
        if self.drain_interval_ms == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "drain_interval_ms must be non-zero",
            ));
        }
        Ok(())
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub fn default_formatter_threads() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, MAX_DEFAULT_FORMATTER_THREADS)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            global_threshold: Priority::Info,
            category: DEFAULT_CATEGORY.to_string(),
            error_threshold: Priority::Error,
            drain_interval_ms: DEFAULT_DRAIN_INTERVAL.as_millis() as u64,
            formatter_threads: Self::default_formatter_threads(),
        }
    }
}
