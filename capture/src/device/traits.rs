//! Driver seam between the negotiation policy and platform capture APIs.
//!
//! The enumerator and selector only talk to these traits, so the policy runs
//! unchanged against V4L2 on Linux and against scripted devices in tests.

use super::media_type::{MediaType, Resolution};
use crate::error::Result;
use crate::frame::FrameBuffer;
use crate::session::VideoSource;

/// Discovers the physical capture devices of a platform.
pub trait DeviceDriver {
    type Device: PhysicalDevice;

    /// Lists devices in driver-reported order. Devices come back inactive.
    fn devices(&self) -> Result<Vec<Self::Device>>;
}

/// One camera as seen by the driver layer.
///
/// # Lifecycle
/// Inactive until `activate` succeeds. Media type queries, format changes
/// and frame reads require an active device. `deactivate` returns the device
/// to the inactive state and must be safe to call on an inactive device.
pub trait PhysicalDevice {
    /// Throwaway handle used to capture at an RGB24 resolution
    type Probe: VideoSource;

    /// Friendly name shown to users
    fn name(&self) -> &str;

    fn activate(&mut self) -> Result<()>;

    /// Every (format family, resolution) pair the device reports, in driver
    /// order, duplicates included.
    fn media_types(&self) -> Result<Vec<MediaType>>;

    /// Configures the device's own stream to emit `media`.
    fn set_media_type(&mut self, media: MediaType) -> Result<()>;

    /// Reads the next frame of the configured stream into `frame`.
    fn read_frame(&mut self, frame: &mut FrameBuffer) -> Result<()>;

    /// Opens a separate RGB24 capture handle at `resolution`. The device
    /// itself is not streaming while the probe is alive.
    fn open_probe(&self, resolution: Resolution) -> Result<Self::Probe>;

    fn deactivate(&mut self) -> Result<()>;
}
