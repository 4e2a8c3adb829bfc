//! Standard output and standard error destinations

use crate::core::{Destination, Result};
use std::io::Write;

/// Writes lines to standard output.
#[derive(Debug, Default)]
pub struct StdoutDestination;

impl StdoutDestination {
    pub fn new() -> Self {
        Self
    }
}

impl Destination for StdoutDestination {
    fn write(&mut self, line: &str) -> Result<()> {
        std::io::stdout().lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }
}

/// Writes lines to standard error.
#[derive(Debug, Default)]
pub struct StderrDestination;

impl StderrDestination {
    pub fn new() -> Self {
        Self
    }
}

impl Destination for StderrDestination {
    fn write(&mut self, line: &str) -> Result<()> {
        std::io::stderr().lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_destinations_accept_lines() {
        let mut out = StdoutDestination::new();
        out.write("stdout destination test line\n").expect("stdout write");
        out.flush().expect("stdout flush");

        let mut err = StderrDestination::new();
        err.write("stderr destination test line\n").expect("stderr write");
        err.flush().expect("stderr flush");
    }
}
