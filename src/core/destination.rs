//! Destination trait for log output sinks

use super::error::Result;

/// A sink receiving fully rendered log lines.
///
/// Destinations are only ever called from the drain worker while it holds
/// the registry lock, so an implementation never sees concurrent calls and
/// only needs to be `Send`.
///
/// Lines passed to [`write`](Destination::write) are already newline
/// terminated.
///
/// # Example
///
/// ```
/// use multi_logger::{Destination, Result};
///
/// struct Collect(Vec<String>);
///
/// impl Destination for Collect {
///     fn write(&mut self, line: &str) -> Result<()> {
///         self.0.push(line.to_string());
///         Ok(())
///     }
///
///     fn flush(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Destination: Send {
    fn write(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn write(&mut self, line: &str) -> Result<()> {
        (**self).write(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
