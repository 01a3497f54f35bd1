//! Owned image buffer.
//!
//! `FrameBuffer` wraps an OpenCV `Mat` holding 8-bit pixels in OpenCV's
//! native channel order (BGR for colour). Sessions keep several of these
//! alive and overwrite them in place frame after frame.

use crate::error::{CaptureError, Result};
use opencv::core::{CV_8UC1, CV_8UC3, CV_8UC4, Mat, Scalar, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;
use std::path::Path;

/// Pixel layouts a `FrameBuffer` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Single channel, 8 bits
    Gray8,
    /// Three channels, OpenCV blue-green-red order
    Bgr8,
    /// Four channels with alpha
    Bgra8,
}

impl PixelFormat {
    pub fn channels(self) -> i32 {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Bgr8 => 3,
            PixelFormat::Bgra8 => 4,
        }
    }

    fn cv_type(self) -> i32 {
        match self {
            PixelFormat::Gray8 => CV_8UC1,
            PixelFormat::Bgr8 => CV_8UC3,
            PixelFormat::Bgra8 => CV_8UC4,
        }
    }

    fn from_cv_type(typ: i32) -> Option<Self> {
        match typ {
            t if t == CV_8UC1 => Some(PixelFormat::Gray8),
            t if t == CV_8UC3 => Some(PixelFormat::Bgr8),
            t if t == CV_8UC4 => Some(PixelFormat::Bgra8),
            _ => None,
        }
    }
}

/// 2D pixel buffer.
///
/// The default value is the empty buffer (0x0, no storage), which is what a
/// preview looks like when no resolution met the selection floor.
#[derive(Clone, Default)]
pub struct FrameBuffer {
    mat: Mat,
}

impl FrameBuffer {
    /// Empty 0x0 buffer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocates a zero-filled buffer.
    pub fn new(width: i32, height: i32, format: PixelFormat) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(CaptureError::Config(format!(
                "buffer dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let mat = Mat::new_rows_cols_with_default(height, width, format.cv_type(), Scalar::all(0.0))?;
        Ok(Self { mat })
    }

    pub fn from_mat(mat: Mat) -> Self {
        Self { mat }
    }

    pub fn width(&self) -> i32 {
        self.mat.cols()
    }

    pub fn height(&self) -> i32 {
        self.mat.rows()
    }

    /// `(width, height)`
    pub fn size(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> i32 {
        self.mat.channels()
    }

    /// Pixel layout, or `None` for empty buffers and non 8-bit data.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        if self.is_empty() {
            return None;
        }
        PixelFormat::from_cv_type(self.mat.typ())
    }

    pub fn is_empty(&self) -> bool {
        self.mat.empty()
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn mat_mut(&mut self) -> &mut Mat {
        &mut self.mat
    }

    pub fn into_mat(self) -> Mat {
        self.mat
    }

    /// Raw pixel bytes, row-major.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        Ok(self.mat.data_bytes()?)
    }

    /// Address of the pixel storage. Stable for as long as the buffer is
    /// written in place without being resized.
    pub fn data_ptr(&self) -> *const u8 {
        self.mat.data()
    }

    /// Deep copy, for callers that need a frame to outlive the next pull.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            mat: self.mat.try_clone()?,
        })
    }

    /// Writes the buffer as an image; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        if self.is_empty() {
            return Err(CaptureError::Config("cannot save an empty frame".to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| CaptureError::Config(format!("non UTF-8 path: {}", path.display())))?;
        if !imgcodecs::imwrite(path_str, &self.mat, &Vector::new())? {
            return Err(CaptureError::Config(format!(
                "no image writer for {}",
                path.display()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &self.channels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_buffer() {
        let frame = FrameBuffer::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.size(), (0, 0));
        assert_eq!(frame.pixel_format(), None);
    }

    #[test]
    fn test_new_buffer_dimensions() {
        let frame = FrameBuffer::new(640, 480, PixelFormat::Bgr8).unwrap();
        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.pixel_format(), Some(PixelFormat::Bgr8));
        assert_eq!(frame.as_bytes().unwrap().len(), 640 * 480 * 3);
    }

    #[test]
    fn test_new_buffer_rejects_zero_size() {
        assert!(FrameBuffer::new(0, 480, PixelFormat::Gray8).is_err());
        assert!(FrameBuffer::new(640, -1, PixelFormat::Gray8).is_err());
    }

    #[test]
    fn test_try_clone_is_deep() {
        let frame = FrameBuffer::new(4, 2, PixelFormat::Gray8).unwrap();
        let copy = frame.try_clone().unwrap();
        assert_eq!(copy.size(), frame.size());
        assert_ne!(copy.data_ptr(), frame.data_ptr());
    }

    #[test]
    fn test_save_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let frame = FrameBuffer::new(8, 8, PixelFormat::Bgr8).unwrap();

        frame.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_empty_rejected() {
        let dir = tempdir().unwrap();
        let result = FrameBuffer::empty().save(&dir.path().join("x.png"));
        assert!(matches!(result, Err(CaptureError::Config(_))));
    }
}
