//! Video sources a capture session can pull frames from.

use crate::error::{CaptureError, Result};
use crate::frame::FrameBuffer;
use opencv::prelude::*;
use opencv::videoio::{CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH, VideoCapture};
use std::path::Path;

/// An open handle that yields decoded frames on demand.
///
/// Implementors own the underlying device or file handle. `release` must be
/// safe to call more than once.
pub trait VideoSource {
    /// Whether the handle is valid and open
    fn is_opened(&self) -> bool;

    /// Decodes the next frame into `frame`, reusing its storage when the
    /// size matches.
    ///
    /// # Returns
    /// * `Ok(true)` - A frame was decoded
    /// * `Ok(false)` - No frame available (end of stream, unplugged device)
    /// * `Err` - The backend reported an error
    fn read(&mut self, frame: &mut FrameBuffer) -> Result<bool>;

    /// Requests an output resolution. Backends may silently pick a
    /// different one.
    fn set_resolution(&mut self, width: u32, height: u32) -> Result<()>;

    /// Frame size the backend reports, `(0, 0)` when unknown.
    fn resolution(&self) -> (u32, u32) {
        (0, 0)
    }

    /// Native frame rate reported by the backend.
    fn frame_rate(&self) -> Result<f64>;

    /// Releases the handle.
    fn release(&mut self) -> Result<()>;
}

/// OpenCV `VideoCapture` backed source, for both camera indices and files.
pub struct OpenCvSource {
    capture: VideoCapture,
}

impl OpenCvSource {
    /// Opens a camera by index using whichever capture API OpenCV prefers.
    pub fn open_device(index: i32) -> Result<Self> {
        let capture = VideoCapture::new(index, CAP_ANY)
            .map_err(|e| CaptureError::Device(format!("Failed to open camera {}: {}", index, e)))?;
        Self::checked(capture, || format!("camera {}", index))
    }

    /// Opens a video file.
    pub fn open_file(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| CaptureError::Config(format!("non UTF-8 path: {}", path.display())))?;
        let capture = VideoCapture::from_file(path_str, CAP_ANY)?;
        Self::checked(capture, || path.display().to_string())
    }

    fn checked(capture: VideoCapture, describe: impl FnOnce() -> String) -> Result<Self> {
        if !capture.is_opened()? {
            return Err(CaptureError::Device(format!(
                "{} could not be opened",
                describe()
            )));
        }
        Ok(Self { capture })
    }
}

impl VideoSource for OpenCvSource {
    fn is_opened(&self) -> bool {
        self.capture.is_opened().unwrap_or(false)
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> Result<bool> {
        Ok(self.capture.read(frame.mat_mut())?)
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> Result<()> {
        self.capture.set(CAP_PROP_FRAME_WIDTH, f64::from(width))?;
        self.capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(height))?;
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        let width = self.capture.get(CAP_PROP_FRAME_WIDTH).unwrap_or(0.0);
        let height = self.capture.get(CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0);
        (width.max(0.0) as u32, height.max(0.0) as u32)
    }

    fn frame_rate(&self) -> Result<f64> {
        Ok(self.capture.get(CAP_PROP_FPS)?)
    }

    fn release(&mut self) -> Result<()> {
        self.capture.release()?;
        Ok(())
    }
}
