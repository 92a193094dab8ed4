//! Log file writer handed to the fmt layer.
//!
//! # Design
//! - The file is opened (and truncated) once; every event writer shares the same handle.
//! - Each formatted event arrives as a single `write` call, so no extra locking is needed.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::error::{Result, TelemetryError};

/// Create or truncate the log file at `path`.
///
/// # Errors
///
/// Returns [`TelemetryError::LogFileOpen`] when the file cannot be created.
pub fn open_log_file(path: &Path) -> Result<LogFileMakeWriter> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFileOpen {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(LogFileMakeWriter {
        file: Arc::new(file),
    })
}

/// `tracing_subscriber` writer factory over a shared log file handle.
#[derive(Debug, Clone)]
pub struct LogFileMakeWriter {
    file: Arc<File>,
}

impl<'a> MakeWriter<'a> for LogFileMakeWriter {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Writer for a single log event.
#[derive(Debug)]
pub struct LogFileWriter {
    file: Arc<File>,
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.file).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.file).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn opening_truncates_previous_run() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("move_file.log");
        fs::write(&path, "stale line\n")?;

        let writer = open_log_file(&path)?;
        writer.make_writer().write_all(b"fresh line\n")?;
        writer.make_writer().write_all(b"second line\n")?;

        assert_eq!(fs::read_to_string(&path)?, "fresh line\nsecond line\n");
        Ok(())
    }

    #[test]
    fn missing_parent_directory_is_reported() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("absent").join("move_file.log");
        let err = open_log_file(&path).unwrap_err();
        assert!(matches!(err, TelemetryError::LogFileOpen { path: ref p, .. } if *p == path));
        Ok(())
    }
}
