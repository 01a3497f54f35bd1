//! Frame buffers and the conversions sessions apply to them.

pub mod buffer;
pub mod converters;

pub use buffer::{FrameBuffer, PixelFormat};
pub use converters::{copy_into, mirror_horizontal, mirrored, to_grayscale};
