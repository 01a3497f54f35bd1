use capture::CaptureError;
use config_loader::ConfigError;
use logging::LoggingError;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Failures that end a facecap run with a non-zero exit code
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
