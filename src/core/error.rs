//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A file destination could not be opened
    #[error("Cannot open file '{path}' for logging: {message}")]
    FileDestinationError { path: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Destination write or flush failure
    #[error("Writer error: {0}")]
    WriterError(String),

    /// A background thread could not be started
    #[error("Failed to spawn {thread} thread: {source}")]
    ThreadSpawn {
        thread: String,
        #[source]
        source: std::io::Error,
    },

    /// The verification callback rejected the delivered output
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file destination error
    pub fn file_destination(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileDestinationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn thread_spawn(thread: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::ThreadSpawn {
            thread: thread.into(),
            source,
        }
    }

    /// Create a verification error, for use inside verification callbacks
    pub fn verification<S: Into<String>>(msg: S) -> Self {
        LoggerError::VerificationFailed(msg.into())
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LoggerConfig", "formatter_threads must be at least 1");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_destination("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileDestinationError { .. }));

        let err = LoggerError::verification("3 errors requested, 2 logged");
        assert!(matches!(err, LoggerError::VerificationFailed(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::file_destination("/var/log/app.log", "Permission denied");
        assert_eq!(
            err.to_string(),
            "Cannot open file '/var/log/app.log' for logging: Permission denied"
        );

        let err = LoggerError::config("LoggerConfig", "drain_interval_ms must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: drain_interval_ms must be non-zero"
        );

        let err = LoggerError::verification("mismatch");
        assert_eq!(err.to_string(), "Verification failed: mismatch");
    }

    #[test]
    fn test_thread_spawn_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left");
        let err = LoggerError::thread_spawn("drain", io_err);

        assert!(matches!(err, LoggerError::ThreadSpawn { .. }));
        assert!(err.to_string().contains("drain"));
        assert!(err.to_string().contains("no threads left"));
    }
}
