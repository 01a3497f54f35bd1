//! Device enumeration.
//!
//! Devices are probed one after the other. Each is activated, cataloged,
//! run through the selector and deactivated before the next one is touched,
//! so no two devices are ever held at once. A device that misbehaves still
//! gets an entry; it never stops the walk.

use super::catalog::MediaTypeCatalog;
use super::listing::DeviceListingEntry;
use super::selector::{ResolutionSelector, Selection};
use super::traits::{DeviceDriver, PhysicalDevice};
use crate::error::Result;
use logging::Logger;

/// Builds the device listing from a driver.
pub struct DeviceEnumerator<D: DeviceDriver> {
    driver: D,
    selector: ResolutionSelector,
    logger: Logger,
}

impl<D: DeviceDriver> DeviceEnumerator<D> {
    pub fn new(driver: D, logger: Logger) -> Self {
        Self {
            selector: ResolutionSelector::new(logger.clone()),
            driver,
            logger,
        }
    }

    /// Replaces the selector, e.g. to change the warm-up frame count.
    pub fn with_selector(mut self, selector: ResolutionSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Probes every device the driver reports, in driver order.
    ///
    /// A driver that cannot list devices yields an empty listing.
    pub fn list_devices(&self) -> Vec<DeviceListingEntry> {
        let devices = match self.driver.devices() {
            Ok(devices) => devices,
            Err(e) => {
                self.logger.error(&format!("Failed to enumerate devices: {}", e));
                return Vec::new();
            }
        };

        self.logger
            .info(&format!("Probing {} capture device(s)", devices.len()));

        devices
            .into_iter()
            .enumerate()
            .map(|(index, mut device)| {
                self.logger
                    .info(&format!("Probing device {}: {}", index, device.name()));
                let selection = self.probe(&mut device);
                DeviceListingEntry::new(device.name(), selection)
            })
            .collect()
    }

    fn probe<P: PhysicalDevice>(&self, device: &mut P) -> Selection {
        let name = device.name().to_string();
        let mut active = match ActiveDevice::activate(device, &self.logger) {
            Ok(active) => active,
            Err(e) => {
                self.logger
                    .warn(&format!("{}: activation failed: {}", name, e));
                return Selection::default();
            }
        };

        let catalog = match Self::catalog(active.device()) {
            Ok(catalog) => catalog,
            Err(e) => {
                self.logger
                    .warn(&format!("{}: media type query failed: {}", name, e));
                return Selection::default();
            }
        };

        self.selector.select(active.device(), &catalog)
    }

    fn catalog<P: PhysicalDevice>(device: &P) -> Result<MediaTypeCatalog> {
        Ok(MediaTypeCatalog::from_media_types(device.media_types()?))
    }
}

/// Keeps a device active for the duration of a probe and deactivates it on
/// every exit path.
struct ActiveDevice<'a, P: PhysicalDevice> {
    device: &'a mut P,
    logger: &'a Logger,
}

impl<'a, P: PhysicalDevice> ActiveDevice<'a, P> {
    /// The device is deactivated even when activation fails.
    fn activate(device: &'a mut P, logger: &'a Logger) -> Result<Self> {
        let mut guard = Self { device, logger };
        guard.device.activate()?;
        Ok(guard)
    }

    fn device(&mut self) -> &mut P {
        self.device
    }
}

impl<P: PhysicalDevice> Drop for ActiveDevice<'_, P> {
    fn drop(&mut self) {
        if let Err(e) = self.device.deactivate() {
            self.logger
                .warn(&format!("{}: deactivation failed: {}", self.device.name(), e));
        }
    }
}
