//! Facial landmark tracking and face analysis facades.
//!
//! The models themselves are external. This crate defines the seams they
//! plug into ([`LandmarkEngine`], [`FaceDescriptorBackend`]), the value
//! types crossing them, and the triangulation template loader the analyser
//! needs at startup.

pub mod analyser;
pub mod error;
pub mod landmarks;
pub mod triangulation;

pub use analyser::{FaceAnalyser, FaceDescriptorBackend, HOG_CELL_SIZE, HogDescriptor};
pub use error::{Result, TrackerError};
pub use landmarks::{
    CameraIntrinsics, DEFAULT_MODEL_LOCATION, LandmarkEngine, Point2, Point3, Pose, Tracker,
    TrackerParameters,
};
pub use triangulation::{DEFAULT_TRIANGULATION_PATH, Triangulation};
