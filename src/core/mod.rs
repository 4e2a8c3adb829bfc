//! Core logger types and traits

pub mod buffer;
pub mod config;
pub mod destination;
pub(crate) mod drain;
pub mod error;
pub(crate) mod ingest;
pub mod logger;
pub mod metrics;
pub mod priority;
pub mod record;
pub mod registry;

pub use buffer::OrderingBuffer;
pub use config::{LoggerConfig, DEFAULT_CATEGORY, DEFAULT_DRAIN_INTERVAL};
pub use destination::Destination;
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder, VerificationCallback};
pub use metrics::LoggerMetrics;
pub use priority::Priority;
pub use record::{CallSite, LogRecord};
pub use registry::{DestinationEntry, DestinationRegistry};
