//! Camera capture and device negotiation.
//!
//! Two independent halves:
//!
//! - [`device`]: enumerate cameras, catalog their MJPG/RGB24 media types,
//!   pick a resolution and grab a mirrored preview per device.
//! - [`session`]: pull frames from a live camera (mirrored) or a video file
//!   (unchanged), keeping a grayscale copy of every frame.
//!
//! Everything is synchronous and single-threaded.

pub mod constants;
pub mod device;
pub mod error;
pub mod frame;
pub mod session;

pub use device::{
    DeviceDriver, DeviceEnumerator, DeviceListingEntry, FormatFamily, MediaType,
    MediaTypeCatalog, PhysicalDevice, Resolution, ResolutionSelector, Selection, SystemDriver,
    list_devices,
};
pub use error::{CaptureError, Result};
pub use frame::{FrameBuffer, PixelFormat};
pub use session::{CaptureSession, LiveConfig, OpenCvSource, SessionState, SourceKind, VideoSource};
