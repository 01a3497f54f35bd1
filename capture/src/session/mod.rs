//! Frame-by-frame capture from cameras and video files.

pub mod capture;
pub mod config;
pub mod source;

pub use capture::{CaptureSession, SessionState, SourceKind};
pub use config::LiveConfig;
pub use source::{OpenCvSource, VideoSource};
