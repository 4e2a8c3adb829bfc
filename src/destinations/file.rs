//! File destination implementation

use crate::core::{Destination, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileDestination {
    path: PathBuf,
    /// Dropped after the first failed write; later lines are skipped
    writer: Option<BufWriter<File>>,
}

impl FileDestination {
    /// Open `path` for logging, truncating any previous content.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| LoggerError::file_destination(path.display().to_string(), e.to_string()))?;
        Ok(Self::with_file(path, file))
    }

    /// Open `path` for logging, keeping existing content.
    pub fn append(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_destination(path.display().to_string(), e.to_string()))?;
        Ok(Self::with_file(path, file))
    }

    fn with_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            writer: Some(BufWriter::new(file)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns false once a write has failed.
    pub fn is_usable(&self) -> bool {
        self.writer.is_some()
    }
}

impl Destination for FileDestination {
    fn write(&mut self, line: &str) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        if let Err(e) = writer.write_all(line.as_bytes()) {
            self.writer = None;
            return Err(LoggerError::io_operation(
                "writing log file",
                format!("'{}' disabled after write failure", self.path.display()),
                e,
            ));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }
        Ok(())
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
