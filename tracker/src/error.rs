//! Error types for the tracker and face analyser.

use capture::CaptureError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The triangulation template could not be read.
    #[error("triangulation template {path} could not be read: {source}")]
    TriangulationMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The triangulation template was read but its content is unusable.
    #[error("malformed triangulation template {origin}: {reason}")]
    TriangulationMalformed { origin: String, reason: String },
    /// The landmark engine or descriptor backend reported a failure.
    #[error("engine error: {0}")]
    Engine(String),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}
