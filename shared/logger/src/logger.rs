//! Cloneable, non-blocking logger handed to capture components.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_writer::spawn_writer_thread;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::thread::JoinHandle;

/// Sending side of the writer thread, shared by every clone of a logger.
///
/// Dropping the last clone closes the channel and waits for the writer to
/// flush what is still queued.
struct WriterHandle {
    sender: Option<Sender<LogMessage>>,
    thread: Option<JoinHandle<()>>,
}

impl WriterHandle {
    fn send(&self, message: LogMessage) {
        if let Some(sender) = &self.sender {
            // A closed channel means the writer thread is gone; nothing left to do.
            let _ = sender.send(message);
        }
    }
}

impl Drop for WriterHandle {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            eprintln!("log writer thread panicked");
        }
    }
}

/// Thread-safe, non-blocking logger.
///
/// All clones and every logger derived through [`Logger::for_component`]
/// share one channel to a single writer thread, so lines from different
/// components never interleave mid-line. Everything logged before the last
/// clone is dropped reaches the file.
///
/// # Examples
///
/// ```no_run
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::new("facecap.log".into(), LogLevel::Info).unwrap();
/// let enumerator = logger.for_component("Enumerator");
/// enumerator.info("probing /dev/video0");
/// ```
#[derive(Clone)]
pub struct Logger {
    writer: Arc<WriterHandle>,
    level: LogLevel,
    component: Option<Arc<str>>,
    log_path: PathBuf,
    console_output: bool,
}

impl Logger {
    /// Creates a logger writing to `log_path` (created if missing).
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be opened for appending.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        Self::with_options(log_path, level, None, false)
    }

    /// Creates a logger tagged with `component` that optionally mirrors each
    /// record to stdout.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: &str,
        console_output: bool,
    ) -> Result<Self> {
        Self::with_options(log_path, level, Some(Arc::from(component)), console_output)
    }

    fn with_options(
        log_path: PathBuf,
        level: LogLevel,
        component: Option<Arc<str>>,
        console_output: bool,
    ) -> Result<Self> {
        let (sender, receiver) = channel();
        let thread = spawn_writer_thread(&log_path, receiver)?;
        Ok(Logger {
            writer: Arc::new(WriterHandle {
                sender: Some(sender),
                thread: Some(thread),
            }),
            level,
            component,
            log_path,
            console_output,
        })
    }

    /// Derives a logger for another component sharing this logger's writer.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(Arc::from(component)),
            ..self.clone()
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        let msg = LogMessage::new(level, self.component.clone(), message.to_string());
        if self.console_output {
            print!("{}", msg.format());
        }
        self.writer.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_logger_respects_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Warn).unwrap();
        logger.debug("debug line");
        logger.info("info line");
        logger.warn("warn line");
        logger.error("error line");
        drop(logger);

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("debug line"));
        assert!(!content.contains("info line"));
        assert!(content.contains("warn line"));
        assert!(content.contains("error line"));
    }

    #[test]
    fn test_for_component_shares_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let root = Logger::with_component(log_path.clone(), LogLevel::Debug, "Main", false)
            .unwrap();
        let session = root.for_component("Session");
        root.info("booting");
        session.info("opened file");
        assert_eq!(session.log_path(), log_path.as_path());
        assert_eq!(session.level(), LogLevel::Debug);
        drop(root);
        drop(session);

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("[component: Main]: booting"));
        assert!(content.contains("[component: Session]: opened file"));
    }

    #[test]
    fn test_logger_clone_across_threads() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let worker = logger.clone();

        thread::spawn(move || worker.info("from worker"))
            .join()
            .unwrap();
        logger.info("from main");
        drop(logger);

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("from worker"));
        assert!(content.contains("from main"));
    }

    #[test]
    fn test_last_drop_flushes_every_line() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::with_component(log_path.clone(), LogLevel::Info, "Main", false)
            .unwrap();
        let session = logger.for_component("Session");
        for i in 0..2000 {
            session.info(&format!("frame {}", i));
        }
        drop(session);
        logger.error("Command failed: final line");
        drop(logger);

        let content = fs::read_to_string(log_path).unwrap();
        assert_eq!(content.lines().count(), 2001);
        assert!(content.contains("[component: Session]: frame 1999"));
        assert!(content.lines().last().unwrap().ends_with("Command failed: final line"));
    }
}
