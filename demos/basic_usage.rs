//! Basic logger usage example
//!
//! Demonstrates the global threshold, per-destination thresholds, enabling
//! and disabling destinations, and the verification hook.
//!
//! Run with: cargo run --example basic_usage

use multi_logger::prelude::*;
use multi_logger::{debug, error, info, warning};

fn main() -> Result<()> {
    println!("=== MultiLogger - Basic Usage Example ===\n");

    let errors = MemoryDestination::new();
    let logger = Logger::builder()
        .global_threshold(Priority::Debug)
        .category("demo")
        .destination("stdout", StdoutDestination::new())
        .destination_with_threshold("errors", Priority::Error, errors.clone())
        .verification_callback(|requested| {
            println!("\nverification: {} error-level messages requested", requested);
            Ok(())
        })
        .build()?;

    println!("1. Logging at different priorities:");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warning!(logger, "This is a warning message");
    error!(logger, "This is an error message");
    logger.critical("This is a critical message");

    println!("2. Raising the global threshold to Warning:");
    logger.set_global_threshold(Priority::Warning);
    info!(logger, "Info message (hidden)");
    warning!(logger, "Warning message (visible)");

    println!("3. Disabling stdout:");
    logger.set_destination_enabled("stdout", false);
    error!(logger, "Only the errors destination sees this");

    logger.shutdown()?;

    println!("\nerrors destination captured {} lines:", errors.len());
    for line in errors.lines() {
        print!("  {}", line);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
