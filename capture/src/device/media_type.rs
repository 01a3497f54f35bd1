//! Media types reported by physical devices.

use crate::constants::selection::{FLOOR_HEIGHT, FLOOR_WIDTH};
use std::fmt;

/// Frame size in pixels.
///
/// Ordering is lexicographic on `(width, height)`, which is the order the
/// catalog walks resolutions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions reach the 640x480 selection floor.
    pub fn meets_floor(&self) -> bool {
        self.width >= FLOOR_WIDTH && self.height >= FLOOR_HEIGHT
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Coarse pixel encoding family. Drives the MJPG-over-RGB24 preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    Mjpg,
    Rgb24,
    /// Any other encoding (YUYV, NV12, H264, ...). Never selected.
    Unsupported,
}

impl FormatFamily {
    /// Classifies a V4L2-style FourCC code.
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Self {
        match fourcc {
            b"MJPG" => FormatFamily::Mjpg,
            b"RGB3" => FormatFamily::Rgb24,
            _ => FormatFamily::Unsupported,
        }
    }

    pub fn fourcc(&self) -> Option<[u8; 4]> {
        match self {
            FormatFamily::Mjpg => Some(*b"MJPG"),
            FormatFamily::Rgb24 => Some(*b"RGB3"),
            FormatFamily::Unsupported => None,
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatFamily::Mjpg => "MJPG",
            FormatFamily::Rgb24 => "RGB24",
            FormatFamily::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// One (format family, resolution) pair a device can be configured to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaType {
    family: FormatFamily,
    resolution: Resolution,
}

impl MediaType {
    pub const fn new(family: FormatFamily, resolution: Resolution) -> Self {
        Self { family, resolution }
    }

    pub fn family(&self) -> FormatFamily {
        self.family
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.resolution)
    }
}
