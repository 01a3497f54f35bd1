//! Orientation and colour conversions between frame buffers.
//!
//! Each function writes into a caller-owned destination so sessions can keep
//! reusing the same storage. OpenCV only reallocates the destination when its
//! size or type differs from what the operation produces.

use super::buffer::FrameBuffer;
use crate::error::{CaptureError, Result};
use opencv::core;
use opencv::imgproc::{COLOR_BGR2GRAY, COLOR_BGRA2GRAY, cvt_color_def};
use opencv::prelude::*;

/// Flip code for a mirror around the vertical axis.
const FLIP_HORIZONTAL: i32 = 1;

/// Writes the left-right mirror of `src` into `dst`. An empty source empties
/// the destination.
pub fn mirror_horizontal(src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
    if src.is_empty() {
        dst.mat_mut().release()?;
        return Ok(());
    }
    core::flip(src.mat(), dst.mat_mut(), FLIP_HORIZONTAL)?;
    Ok(())
}

/// Mirrors a frame into a newly allocated buffer.
pub fn mirrored(src: &FrameBuffer) -> Result<FrameBuffer> {
    let mut dst = FrameBuffer::empty();
    mirror_horizontal(src, &mut dst)?;
    Ok(dst)
}

/// Copies `src` into `dst` unchanged.
pub fn copy_into(src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
    if src.is_empty() {
        dst.mat_mut().release()?;
        return Ok(());
    }
    src.mat().copy_to(dst.mat_mut())?;
    Ok(())
}

/// Converts a colour (or already gray) frame into the single-channel `dst`.
pub fn to_grayscale(src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
    if src.is_empty() {
        return Err(CaptureError::Config(
            "cannot convert an empty frame to grayscale".to_string(),
        ));
    }
    match src.channels() {
        1 => src.mat().copy_to(dst.mat_mut())?,
        3 => cvt_color_def(src.mat(), dst.mat_mut(), COLOR_BGR2GRAY)?,
        4 => cvt_color_def(src.mat(), dst.mat_mut(), COLOR_BGRA2GRAY)?,
        n => {
            return Err(CaptureError::Config(format!(
                "unsupported channel count for grayscale: {}",
                n
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use opencv::core::{CV_8UC3, Mat, Scalar, Vec3b};

    /// 3x1 BGR frame with distinct pixels A, B, C.
    fn row_abc() -> FrameBuffer {
        let mut mat =
            Mat::new_rows_cols_with_default(1, 3, CV_8UC3, Scalar::all(0.0)).unwrap();
        *mat.at_2d_mut::<Vec3b>(0, 0).unwrap() = Vec3b::from([1, 1, 1]);
        *mat.at_2d_mut::<Vec3b>(0, 1).unwrap() = Vec3b::from([2, 2, 2]);
        *mat.at_2d_mut::<Vec3b>(0, 2).unwrap() = Vec3b::from([3, 3, 3]);
        FrameBuffer::from_mat(mat)
    }

    #[test]
    fn test_mirror_reverses_row() {
        let src = row_abc();
        let dst = mirrored(&src).unwrap();
        assert_eq!(dst.as_bytes().unwrap(), &[3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let src = row_abc();
        let once = mirrored(&src).unwrap();
        let twice = mirrored(&once).unwrap();
        assert_eq!(twice.as_bytes().unwrap(), src.as_bytes().unwrap());
    }

    #[test]
    fn test_mirror_empty_source() {
        let mut dst = FrameBuffer::new(2, 2, PixelFormat::Bgr8).unwrap();
        mirror_horizontal(&FrameBuffer::empty(), &mut dst).unwrap();
        assert!(dst.is_empty());
    }

    #[test]
    fn test_copy_into_keeps_orientation() {
        let src = row_abc();
        let mut dst = FrameBuffer::empty();
        copy_into(&src, &mut dst).unwrap();
        assert_eq!(dst.as_bytes().unwrap(), src.as_bytes().unwrap());
    }

    #[test]
    fn test_grayscale_reuses_matching_destination() {
        let src = FrameBuffer::new(16, 8, PixelFormat::Bgr8).unwrap();
        let mut gray = FrameBuffer::new(16, 8, PixelFormat::Gray8).unwrap();
        let before = gray.data_ptr();

        to_grayscale(&src, &mut gray).unwrap();

        assert_eq!(gray.data_ptr(), before);
        assert_eq!(gray.channels(), 1);
    }

    #[test]
    fn test_grayscale_of_uniform_colour() {
        let mat = Mat::new_rows_cols_with_default(2, 2, CV_8UC3, Scalar::all(200.0)).unwrap();
        let src = FrameBuffer::from_mat(mat);
        let mut gray = FrameBuffer::empty();

        to_grayscale(&src, &mut gray).unwrap();

        assert!(gray.as_bytes().unwrap().iter().all(|&v| v == 200));
    }

    #[test]
    fn test_grayscale_rejects_empty() {
        let mut gray = FrameBuffer::empty();
        assert!(to_grayscale(&FrameBuffer::empty(), &mut gray).is_err());
    }
}
