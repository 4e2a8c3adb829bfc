//! # MultiLogger
//!
//! A thread-safe logger writing to any number of destinations, all of
//! which receive the same messages in the same chronological order.
//!
//! ## Features
//!
//! - **Ordered**: every record is timestamped on the caller's thread and
//!   dispatched in timestamp order to every destination
//! - **Non-blocking**: formatting and I/O happen on background threads
//! - **Per-destination thresholds**: on top of a global threshold
//! - **Verification hook**: runs at shutdown after every destination is
//!   flushed, with the number of error-level messages requested

pub mod core;
pub mod destinations;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        CallSite, Destination, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        Priority, Result,
    };
    pub use crate::destinations::{
        FileDestination, MemoryDestination, StderrDestination, StdoutDestination,
    };
    pub use crate::global::{global_logger, shutdown_global};
}

pub use crate::core::{
    CallSite, Destination, DestinationEntry, DestinationRegistry, LogRecord, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OrderingBuffer, Priority, Result,
    VerificationCallback, DEFAULT_CATEGORY, DEFAULT_DRAIN_INTERVAL,
};
pub use destinations::{FileDestination, MemoryDestination, StderrDestination, StdoutDestination};
pub use global::{global_logger, shutdown_global};
