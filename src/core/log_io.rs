use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::alerts::sinks::LogSink;
use super::error::SinkError;

/// Durable notification log: console lines through the `log` facade and
/// an append-only text file.
pub struct DurableLog {
    path: PathBuf,
}

impl DurableLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for DurableLog {
    fn write_console(&self, text: &str) -> Result<(), SinkError> {
        log::info!(target: "inbound", "{}", text);
        Ok(())
    }

    fn append_file(&self, line: &str) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
