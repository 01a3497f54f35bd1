//! Live session configuration.

use crate::constants::limits::{MAX_DIMENSION, MIN_DIMENSION};
use crate::device::Resolution;
use crate::error::{CaptureError, Result};

/// Settings for opening a live camera session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveConfig {
    /// Camera index as understood by the capture backend (0 = first camera)
    pub device_index: u32,
    /// Requested frame width (None = backend default)
    pub width: Option<u32>,
    /// Requested frame height (None = backend default)
    pub height: Option<u32>,
}

impl LiveConfig {
    /// Creates a configuration without resolution hints
    ///
    /// # Returns
    /// * `Err(CaptureError::Config)` - If the index does not fit the
    ///   backend's signed index type
    pub fn new(device_index: u32) -> Result<Self> {
        if i32::try_from(device_index).is_err() {
            return Err(CaptureError::Config(format!(
                "Device index out of range: {}",
                device_index
            )));
        }
        Ok(Self {
            device_index,
            width: None,
            height: None,
        })
    }

    /// Sets the resolution hint
    ///
    /// # Arguments
    /// * `width` - Frame width in pixels (1-7680)
    /// * `height` - Frame height in pixels (1-7680)
    pub fn with_resolution(mut self, width: u32, height: u32) -> Result<Self> {
        check_dimension("Width", width)?;
        check_dimension("Height", height)?;
        self.width = Some(width);
        self.height = Some(height);
        Ok(self)
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Resolution::new(w, h)),
            _ => None,
        }
    }

    /// Index in the form OpenCV expects. Validated at construction.
    pub fn backend_index(&self) -> i32 {
        i32::try_from(self.device_index).unwrap_or(i32::MAX)
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: None,
            height: None,
        }
    }
}

fn check_dimension(label: &str, value: u32) -> Result<()> {
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        return Err(CaptureError::Config(format!(
            "{} must be between {} and {}, got {}",
            label, MIN_DIMENSION, MAX_DIMENSION, value
        )));
    }
    Ok(())
}
