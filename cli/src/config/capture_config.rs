use serde::Deserialize;
use std::path::PathBuf;

/// Capture defaults used when the command line does not say otherwise
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
    /// Directory `list` writes device previews into
    pub preview_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            device_index: 0,
            width: 640,
            height: 480,
            preview_dir: None,
        }
    }
}
