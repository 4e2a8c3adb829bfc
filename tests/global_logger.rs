//! The process-wide logger gets its own test binary since shutting it
//! down is permanent for the life of the process.

use multi_logger::prelude::*;
use multi_logger::{critical_global, debug_global, error_global, info_global, log_global, warning_global};
use std::sync::Arc;
use std::thread;

#[test]
fn test_global_logger_lifecycle() {
    let logger = global_logger();
    assert!(std::ptr::eq(logger, global_logger()));
    assert_eq!(logger.category(), "global");
    assert_eq!(logger.global_threshold(), Priority::Info);

    let memory = MemoryDestination::new();
    logger.add_destination("memory", memory.clone());

    let requested = Arc::new(parking_lot::Mutex::new(None));
    let requested_clone = Arc::clone(&requested);
    logger.set_verification_callback(move |errors| {
        *requested_clone.lock() = Some(errors);
        Ok(())
    });

    let handles: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                log_global!(Priority::Info, "worker {} up", t);
                log_global!(Priority::Error, "worker {} failed", t);
                log_global!(Priority::Debug, "worker {} hidden", t);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    debug_global!("hidden by the Info threshold");
    info_global!("info {}", 1);
    warning_global!("warning {}", 2);
    error_global!("error {}", 3);
    critical_global!("critical {}", 4);

    shutdown_global().expect("global shutdown");

    assert_eq!(memory.len(), 12);
    assert_eq!(*requested.lock(), Some(6));
    let lines = memory.lines();
    for expected in ["Info: info 1", "Warning: warning 2", "Error: error 3", "Critical: critical 4"] {
        let line = lines.iter().find(|line| line.contains(expected)).expect("level macro delivered");
        assert!(line.contains(" test_global_logger_lifecycle "), "line was {}", line);
    }
    assert!(memory.lines().iter().all(|line| line.contains(" global ")));

    // Stopped for good
    log_global!(Priority::Critical, "too late");
    assert_eq!(memory.len(), 12);
    shutdown_global().expect("second shutdown is a no-op");
}
