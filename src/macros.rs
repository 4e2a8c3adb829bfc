//! Logging macros for ergonomic log message formatting.
//!
//! Each macro formats its arguments like `format!`, records the calling
//! function, file and line, and hands the result to a logger.
//!
//! # Examples
//!
//! ```
//! use multi_logger::prelude::*;
//! use multi_logger::info;
//!
//! let logger = Logger::new(Priority::Info, "server")?;
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! # Ok::<(), multi_logger::LoggerError>(())
//! ```

/// Name of the enclosing function, without its module path.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        let path = path.strip_suffix("::__here").unwrap_or(path);
        let path = path.trim_end_matches("::{{closure}}");
        match path.rfind("::") {
            Some(pos) => &path[pos + 2..],
            None => path,
        }
    }};
}

/// Build a [`CallSite`](crate::CallSite) for the current location.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new($crate::__function_name!(), file!(), line!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use multi_logger::prelude::*;
/// # let logger = Logger::new(Priority::Info, "docs")?;
/// use multi_logger::log;
/// log!(logger, Priority::Info, "Simple message");
/// log!(logger, Priority::Error, "Error code: {}", 500);
/// # Ok::<(), multi_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $priority:expr, $($arg:tt)+) => {
        $logger.log($priority, format!($($arg)+), $crate::call_site!())
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Critical, $($arg)+)
    };
}

/// Log through the process-wide logger returned by
/// [`global_logger`](crate::global_logger).
///
/// ```
/// use multi_logger::{log_global, Priority};
/// log_global!(Priority::Warning, "disk usage at {}%", 91);
/// ```
#[macro_export]
macro_rules! log_global {
    ($priority:expr, $($arg:tt)+) => {
        $crate::log!($crate::global_logger(), $priority, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_global {
    ($($arg:tt)+) => {
        $crate::log_global!($crate::Priority::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info_global {
    ($($arg:tt)+) => {
        $crate::log_global!($crate::Priority::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning_global {
    ($($arg:tt)+) => {
        $crate::log_global!($crate::Priority::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error_global {
    ($($arg:tt)+) => {
        $crate::log_global!($crate::Priority::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical_global {
    ($($arg:tt)+) => {
        $crate::log_global!($crate::Priority::Critical, $($arg)+)
    };
}
