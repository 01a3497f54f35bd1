//! Error types for logging operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Errors that can occur while setting up a logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be created or opened for appending.
    #[error("cannot open log file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The writer thread could not be started.
    #[error("cannot start log writer: {0}")]
    Writer(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_open_error_mentions_path() {
        let err = LoggingError::Open {
            path: PathBuf::from("/nope/facecap.log"),
            source: io::Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/facecap.log"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(ErrorKind::Other, "spawn failed");
        let logging_err: LoggingError = io_err.into();
        assert!(matches!(logging_err, LoggingError::Writer(_)));
    }
}
