//! Log priority definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log message.
///
/// The declaration order is the threshold order: a message passes a
/// threshold when its priority is greater than or equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Priority {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl Priority {
    /// All priorities in ascending order.
    pub const ALL: [Priority; 5] = [
        Priority::Debug,
        Priority::Info,
        Priority::Warning,
        Priority::Error,
        Priority::Critical,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Priority::Debug => "Debug",
            Priority::Info => "Info",
            Priority::Warning => "Warning",
            Priority::Error => "Error",
            Priority::Critical => "Critical",
        }
    }

    /// Returns true if a message of this priority passes `threshold`.
    #[inline]
    pub fn passes(self, threshold: Priority) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Priority::Debug),
            "info" => Ok(Priority::Info),
            "warn" | "warning" => Ok(Priority::Warning),
            "error" => Ok(Priority::Error),
            "critical" | "fatal" => Ok(Priority::Critical),
            _ => Err(format!("Invalid priority: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::Debug < Priority::Info);
        assert!(Priority::Info < Priority::Warning);
        assert!(Priority::Warning < Priority::Error);
        assert!(Priority::Error < Priority::Critical);
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Priority::Info.passes(Priority::Info));
        assert!(Priority::Error.passes(Priority::Info));
        assert!(!Priority::Debug.passes(Priority::Info));
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARN".parse::<Priority>(), Ok(Priority::Warning));
        assert_eq!("warning".parse::<Priority>(), Ok(Priority::Warning));
        assert_eq!("Critical".parse::<Priority>(), Ok(Priority::Critical));
        assert!("verbose".parse::<Priority>().is_err());
    }

    #[test]
    fn test_display_matches_line_format() {
        assert_eq!(Priority::Debug.to_string(), "Debug");
        assert_eq!(Priority::Warning.to_string(), "Warning");
    }
}
