//! Device discovery and format negotiation.

pub mod catalog;
pub mod enumerator;
pub mod listing;
pub mod media_type;
pub mod selector;
pub mod traits;
#[cfg(target_os = "linux")]
pub mod v4l2;

pub use catalog::MediaTypeCatalog;
pub use enumerator::DeviceEnumerator;
pub use listing::DeviceListingEntry;
pub use media_type::{FormatFamily, MediaType, Resolution};
pub use selector::{ResolutionSelector, Selection, walk_resolutions};
pub use traits::{DeviceDriver, PhysicalDevice};

#[cfg(target_os = "linux")]
pub use v4l2::{V4l2Device, V4l2Driver, V4l2Probe};

/// Driver used by `list_devices` on this platform.
#[cfg(target_os = "linux")]
pub type SystemDriver = V4l2Driver;

/// Driver used by `list_devices` on this platform.
#[cfg(not(target_os = "linux"))]
pub type SystemDriver = NoDeviceDriver;

/// Driver for platforms without a native backend. Reports no devices.
#[cfg(not(target_os = "linux"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDeviceDriver;

#[cfg(not(target_os = "linux"))]
mod unsupported {
    use super::{DeviceDriver, MediaType, NoDeviceDriver, PhysicalDevice, Resolution};
    use crate::error::Result;
    use crate::frame::FrameBuffer;
    use crate::session::OpenCvSource;

    /// Uninhabited; `NoDeviceDriver` never yields a device.
    pub enum NoDevice {}

    impl DeviceDriver for NoDeviceDriver {
        type Device = NoDevice;

        fn devices(&self) -> Result<Vec<NoDevice>> {
            Ok(Vec::new())
        }
    }

    impl PhysicalDevice for NoDevice {
        type Probe = OpenCvSource;

        fn name(&self) -> &str {
            match *self {}
        }

        fn activate(&mut self) -> Result<()> {
            match *self {}
        }

        fn media_types(&self) -> Result<Vec<MediaType>> {
            match *self {}
        }

        fn set_media_type(&mut self, _media: MediaType) -> Result<()> {
            match *self {}
        }

        fn read_frame(&mut self, _frame: &mut FrameBuffer) -> Result<()> {
            match *self {}
        }

        fn open_probe(&self, _resolution: Resolution) -> Result<OpenCvSource> {
            match *self {}
        }

        fn deactivate(&mut self) -> Result<()> {
            match *self {}
        }
    }
}

/// Enumerates the cameras of this machine with the platform driver.
pub fn list_devices(logger: logging::Logger) -> Vec<DeviceListingEntry> {
    DeviceEnumerator::new(SystemDriver::default(), logger).list_devices()
}
