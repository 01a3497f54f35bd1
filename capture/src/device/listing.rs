//! Public device listing record.

use super::media_type::{FormatFamily, Resolution};
use super::selector::Selection;
use crate::frame::FrameBuffer;

/// One camera as reported to callers by `DeviceEnumerator::list_devices`.
#[derive(Debug, Clone)]
pub struct DeviceListingEntry {
    name: String,
    family: Option<FormatFamily>,
    resolutions: Vec<Resolution>,
    chosen: Option<Resolution>,
    preview: FrameBuffer,
}

impl DeviceListingEntry {
    pub fn new(name: impl Into<String>, selection: Selection) -> Self {
        Self {
            name: name.into(),
            family: selection.family,
            resolutions: selection.resolutions,
            chosen: selection.chosen,
            preview: selection.preview,
        }
    }

    /// Entry for a device that could not be probed.
    pub fn degenerate(name: impl Into<String>) -> Self {
        Self::new(name, Selection::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format family the resolutions belong to, `None` when the device
    /// offered neither MJPG nor RGB24.
    pub fn family(&self) -> Option<FormatFamily> {
        self.family
    }

    /// Available resolutions, ascending by `(width, height)`.
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn chosen(&self) -> Option<Resolution> {
        self.chosen
    }

    /// Mirrored preview still; empty when no resolution met the floor.
    pub fn preview(&self) -> &FrameBuffer {
        &self.preview
    }

    /// Resolution to open a live session with: the chosen one, else the
    /// lowest listed one.
    pub fn default_resolution(&self) -> Option<Resolution> {
        self.chosen.or_else(|| self.resolutions.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_entry() {
        let entry = DeviceListingEntry::degenerate("Broken Cam");
        assert_eq!(entry.name(), "Broken Cam");
        assert_eq!(entry.family(), None);
        assert!(entry.resolutions().is_empty());
        assert!(entry.preview().is_empty());
        assert_eq!(entry.default_resolution(), None);
    }

    #[test]
    fn test_default_resolution_falls_back_to_lowest() {
        let selection = Selection {
            resolutions: vec![Resolution::new(160, 120), Resolution::new(320, 240)],
            ..Selection::default()
        };
        let entry = DeviceListingEntry::new("Low Res", selection);
        assert_eq!(entry.default_resolution(), Some(Resolution::new(160, 120)));
    }

    #[test]
    fn test_default_resolution_prefers_chosen() {
        let selection = Selection {
            family: Some(FormatFamily::Rgb24),
            resolutions: vec![Resolution::new(320, 240), Resolution::new(640, 480)],
            chosen: Some(Resolution::new(640, 480)),
            ..Selection::default()
        };
        let entry = DeviceListingEntry::new("HD", selection);
        assert_eq!(entry.family(), Some(FormatFamily::Rgb24));
        assert_eq!(entry.default_resolution(), Some(Resolution::new(640, 480)));
    }
}
