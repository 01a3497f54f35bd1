//! Per-device catalog of usable media types.

use super::media_type::{FormatFamily, MediaType, Resolution};
use std::collections::BTreeSet;

/// Usable media types of one device, split by format family.
///
/// Each family keeps its resolutions deduplicated and ascending by
/// `(width, height)`. Built once per probe and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaTypeCatalog {
    mjpg: BTreeSet<Resolution>,
    rgb24: BTreeSet<Resolution>,
}

impl MediaTypeCatalog {
    /// Builds a catalog from whatever a device reported.
    ///
    /// Unsupported families are dropped. Repeated resolutions collapse into
    /// one entry per family (drivers commonly list a size once per frame
    /// interval).
    pub fn from_media_types<I>(media_types: I) -> Self
    where
        I: IntoIterator<Item = MediaType>,
    {
        let mut catalog = Self::default();
        for media in media_types {
            match media.family() {
                FormatFamily::Mjpg => {
                    catalog.mjpg.insert(media.resolution());
                }
                FormatFamily::Rgb24 => {
                    catalog.rgb24.insert(media.resolution());
                }
                FormatFamily::Unsupported => {}
            }
        }
        catalog
    }

    /// MJPG resolutions, ascending.
    pub fn mjpg(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.mjpg.iter().copied()
    }

    /// RGB24 resolutions, ascending.
    pub fn rgb24(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.rgb24.iter().copied()
    }

    pub fn family(&self, family: FormatFamily) -> Vec<Resolution> {
        match family {
            FormatFamily::Mjpg => self.mjpg().collect(),
            FormatFamily::Rgb24 => self.rgb24().collect(),
            FormatFamily::Unsupported => Vec::new(),
        }
    }

    pub fn has_mjpg(&self) -> bool {
        !self.mjpg.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.mjpg.is_empty() && self.rgb24.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mjpg.len() + self.rgb24.len()
    }
}
