//! File logger shared by the capture, tracker and CLI crates.
//!
//! Records are stamped on the calling thread and appended to the log file by
//! one background writer, so logging never blocks a frame loop on disk I/O.

pub mod error;
mod log_level;
mod log_message;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
