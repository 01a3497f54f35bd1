//! Background log file writer.

use crate::error::{LoggingError, Result};
use crate::log_message::LogMessage;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

/// Appends records to the log file from a dedicated thread.
pub(crate) struct LogWriter {
    file: File,
}

impl LogWriter {
    pub fn open(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|source| LoggingError::Open {
                path: log_path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }

    fn write_message(&mut self, message: &LogMessage) {
        let result = self
            .file
            .write_all(message.format().as_bytes())
            .and_then(|_| self.file.flush());
        if let Err(e) = result {
            eprintln!("log write failed: {}", e);
        }
    }

    /// Drains the channel until every sender is gone.
    pub fn run(mut self, receiver: Receiver<LogMessage>) {
        for message in receiver {
            self.write_message(&message);
        }
    }
}

/// Opens the file on the caller's thread so open errors surface immediately,
/// then moves the writer onto its own thread. The thread exits once every
/// sender is dropped and the channel is drained.
pub(crate) fn spawn_writer_thread(
    log_path: &Path,
    receiver: Receiver<LogMessage>,
) -> Result<JoinHandle<()>> {
    let writer = LogWriter::open(log_path)?;
    let handle = thread::Builder::new()
        .name("log-writer".to_string())
        .spawn(move || writer.run(receiver))?;
    Ok(handle)
}
