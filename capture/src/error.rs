//! Error types for capture operations.
//!
//! Device probing problems are deliberately absent from the caller-facing
//! surface of enumeration: they are logged and folded into empty listing
//! entries. What remains here is what a session or a driver call can report.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaptureError>;

/// Error type for capture operations
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A frame pull produced no frame (end of stream or device error).
    /// Terminal for the session; nothing retries internally.
    #[error("capture failed: source yielded no frame")]
    CaptureFailed,
    /// The session has no usable handle (never opened, or already closed).
    #[error("capture source is not open")]
    NotOpen,
    /// A frame arrived whose size differs from the session's grayscale buffer.
    #[error("frame size changed from {expected_width}x{expected_height} to {width}x{height}")]
    GeometryChanged {
        expected_width: i32,
        expected_height: i32,
        width: i32,
        height: i32,
    },
    /// Driver-level failure while talking to a physical device.
    #[error("device error: {0}")]
    Device(String),
    /// Invalid session or device configuration.
    #[error("config error: {0}")]
    Config(String),
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CaptureError {
    /// True for the frame-pull failure signal callers treat as end of session.
    pub fn is_capture_failure(&self) -> bool {
        matches!(self, CaptureError::CaptureFailed)
    }
}
