//! V4L2 driver.
//!
//! Devices are discovered through the `/dev/video*` nodes. Formats and frame
//! sizes come from the V4L2 enumeration ioctls; frames are pulled through a
//! memory-mapped buffer queue and decoded into BGR with OpenCV.

use super::media_type::{FormatFamily, MediaType, Resolution};
use super::traits::{DeviceDriver, PhysicalDevice};
use crate::error::{CaptureError, Result};
use crate::frame::FrameBuffer;
use crate::session::VideoSource;
use opencv::core::{CV_8UC3, Mat, Scalar, Vector};
use opencv::imgcodecs::{IMREAD_COLOR, imdecode};
use opencv::imgproc::{COLOR_RGB2BGR, cvt_color_def};
use opencv::prelude::*;
use ouroboros::self_referencing;
use std::path::{Path, PathBuf};
use v4l::buffer::Type;
use v4l::framesize::FrameSizeEnum;
use v4l::io::traits::CaptureStream;
use v4l::prelude::MmapStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

/// Buffers queued in the memory-mapped stream
const STREAM_BUFFERS: u32 = 4;

/// Lists the V4L2 video nodes of the machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct V4l2Driver;

impl DeviceDriver for V4l2Driver {
    type Device = V4l2Device;

    fn devices(&self) -> Result<Vec<V4l2Device>> {
        let mut nodes = v4l::context::enum_devices();
        nodes.sort_by_key(|node| node.index());
        Ok(nodes
            .into_iter()
            .map(|node| {
                let name = node
                    .name()
                    .unwrap_or_else(|| format!("Video device {}", node.index()));
                V4l2Device::new(node.path().to_path_buf(), name)
            })
            .collect())
    }
}

/// One `/dev/videoN` node.
pub struct V4l2Device {
    path: PathBuf,
    name: String,
    handle: Option<V4l2Handle>,
}

impl V4l2Device {
    pub fn new(path: PathBuf, name: String) -> Self {
        Self {
            path,
            name,
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn handle(&self) -> Result<&V4l2Handle> {
        self.handle.as_ref().ok_or(CaptureError::NotOpen)
    }

    fn handle_mut(&mut self) -> Result<&mut V4l2Handle> {
        self.handle.as_mut().ok_or(CaptureError::NotOpen)
    }
}

impl PhysicalDevice for V4l2Device {
    type Probe = V4l2Probe;

    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self) -> Result<()> {
        if self.handle.is_none() {
            self.handle = Some(V4l2Handle::open(&self.path)?);
        }
        Ok(())
    }

    fn media_types(&self) -> Result<Vec<MediaType>> {
        let device = self.handle()?.device()?;
        let mut media_types = Vec::new();

        for description in device.enum_formats()? {
            let family = FormatFamily::from_fourcc(&description.fourcc.repr);
            if family == FormatFamily::Unsupported {
                continue;
            }
            for frame_size in device.enum_framesizes(description.fourcc)? {
                match frame_size.size {
                    FrameSizeEnum::Discrete(size) => {
                        media_types
                            .push(MediaType::new(family, Resolution::new(size.width, size.height)));
                    }
                    FrameSizeEnum::Stepwise(range) => {
                        let sizes = stepwise_resolutions(
                            SizeSpan::new(range.min_width, range.max_width, range.step_width),
                            SizeSpan::new(range.min_height, range.max_height, range.step_height),
                        );
                        media_types.extend(
                            sizes.into_iter().map(|resolution| MediaType::new(family, resolution)),
                        );
                    }
                }
            }
        }

        Ok(media_types)
    }

    fn set_media_type(&mut self, media: MediaType) -> Result<()> {
        self.handle_mut()?.set_format(media)
    }

    fn read_frame(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.handle_mut()?.read_into(frame)
    }

    fn open_probe(&self, resolution: Resolution) -> Result<V4l2Probe> {
        let mut handle = V4l2Handle::open(&self.path)?;
        handle.set_format(MediaType::new(FormatFamily::Rgb24, resolution))?;
        Ok(V4l2Probe {
            handle: Some(handle),
        })
    }

    fn deactivate(&mut self) -> Result<()> {
        self.handle = None;
        Ok(())
    }
}

/// Common capture sizes tried against stepwise and continuous ranges.
const SIZE_LADDER: [(u32, u32); 12] = [
    (160, 120),
    (320, 240),
    (352, 288),
    (640, 360),
    (640, 480),
    (800, 600),
    (1024, 768),
    (1280, 720),
    (1280, 960),
    (1600, 1200),
    (1920, 1080),
    (3840, 2160),
];

/// One axis of a stepwise frame-size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SizeSpan {
    min: u32,
    max: u32,
    step: u32,
}

impl SizeSpan {
    fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// Within `[min, max]` and on the step grid. A zero step accepts any value.
    fn admits(&self, value: u32) -> bool {
        value >= self.min
            && value <= self.max
            && (self.step == 0 || (value - self.min) % self.step == 0)
    }
}

/// Sizes a stepwise range can produce: both endpoints plus every ladder
/// size that sits on the grid. Unordered; the catalog sorts and dedups.
fn stepwise_resolutions(width: SizeSpan, height: SizeSpan) -> Vec<Resolution> {
    let mut sizes = vec![
        Resolution::new(width.min, height.min),
        Resolution::new(width.max, height.max),
    ];
    sizes.extend(
        SIZE_LADDER
            .iter()
            .filter(|&&(w, h)| width.admits(w) && height.admits(h))
            .map(|&(w, h)| Resolution::new(w, h)),
    );
    sizes
}

/// Separate RGB24 handle on a device node, released on drop.
pub struct V4l2Probe {
    handle: Option<V4l2Handle>,
}

impl VideoSource for V4l2Probe {
    fn is_opened(&self) -> bool {
        self.handle.is_some()
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> Result<bool> {
        let handle = self.handle.as_mut().ok_or(CaptureError::NotOpen)?;
        handle.read_into(frame)?;
        Ok(!frame.is_empty())
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> Result<()> {
        let handle = self.handle.as_mut().ok_or(CaptureError::NotOpen)?;
        handle.set_format(MediaType::new(
            FormatFamily::Rgb24,
            Resolution::new(width, height),
        ))
    }

    fn resolution(&self) -> (u32, u32) {
        self.handle
            .as_ref()
            .and_then(|handle| handle.format)
            .map(|media| (media.resolution().width, media.resolution().height))
            .unwrap_or((0, 0))
    }

    fn frame_rate(&self) -> Result<f64> {
        Err(CaptureError::Device(
            "frame rate is not tracked for probe handles".to_string(),
        ))
    }

    fn release(&mut self) -> Result<()> {
        self.handle = None;
        Ok(())
    }
}

#[self_referencing]
struct StreamingDevice {
    device: Device,
    #[borrows(device)]
    #[covariant]
    stream: MmapStream<'this>,
}

enum HandleState {
    Idle(Device),
    Streaming(StreamingDevice),
}

/// Open device node plus its configured format. Streaming starts lazily on
/// the first read and stops whenever the format changes.
struct V4l2Handle {
    state: Option<HandleState>,
    format: Option<MediaType>,
    /// Bytes per line reported by the driver, 0 when unknown
    stride: u32,
}

impl V4l2Handle {
    fn open(path: &Path) -> Result<Self> {
        let device = Device::with_path(path).map_err(|e| {
            CaptureError::Device(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self {
            state: Some(HandleState::Idle(device)),
            format: None,
            stride: 0,
        })
    }

    fn device(&self) -> Result<&Device> {
        match &self.state {
            Some(HandleState::Idle(device)) => Ok(device),
            Some(HandleState::Streaming(streaming)) => Ok(streaming.borrow_device()),
            None => Err(CaptureError::NotOpen),
        }
    }

    fn set_format(&mut self, media: MediaType) -> Result<()> {
        let fourcc = media
            .family()
            .fourcc()
            .ok_or_else(|| CaptureError::Device(format!("cannot stream {}", media)))?;
        self.stop();

        let resolution = media.resolution();
        let requested = Format::new(resolution.width, resolution.height, FourCC::new(&fourcc));
        let applied = self.device()?.set_format(&requested)?;
        if applied.fourcc != requested.fourcc {
            return Err(CaptureError::Device(format!(
                "driver refused {}, kept {}",
                media, applied.fourcc
            )));
        }

        self.stride = applied.stride;
        self.format = Some(MediaType::new(
            media.family(),
            Resolution::new(applied.width, applied.height),
        ));
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        match self.state.take() {
            Some(HandleState::Idle(device)) => {
                let built = StreamingDevice::try_new_or_recover(device, |device| {
                    MmapStream::with_buffers(device, Type::VideoCapture, STREAM_BUFFERS)
                });
                match built {
                    Ok(streaming) => {
                        self.state = Some(HandleState::Streaming(streaming));
                        Ok(())
                    }
                    Err((e, heads)) => {
                        self.state = Some(HandleState::Idle(heads.device));
                        Err(e.into())
                    }
                }
            }
            Some(streaming) => {
                self.state = Some(streaming);
                Ok(())
            }
            None => Err(CaptureError::NotOpen),
        }
    }

    fn stop(&mut self) {
        self.state = match self.state.take() {
            Some(HandleState::Streaming(streaming)) => {
                Some(HandleState::Idle(streaming.into_heads().device))
            }
            other => other,
        };
    }

    fn read_into(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        let media = self
            .format
            .ok_or_else(|| CaptureError::Device("no format configured".to_string()))?;
        let stride = self.stride as usize;
        self.start()?;

        match &mut self.state {
            Some(HandleState::Streaming(streaming)) => {
                streaming.with_stream_mut(|stream| -> Result<()> {
                    let (buf, meta) = stream.next()?;
                    let used = (meta.bytesused as usize).min(buf.len());
                    decode(media, stride, &buf[..used], frame)
                })
            }
            _ => Err(CaptureError::NotOpen),
        }
    }
}

/// Decodes one driver buffer into a BGR frame. `stride` is the RGB24 line
/// pitch in bytes; values below `width * 3` mean tightly packed rows.
fn decode(media: MediaType, stride: usize, data: &[u8], frame: &mut FrameBuffer) -> Result<()> {
    match media.family() {
        FormatFamily::Mjpg => {
            let encoded = Vector::<u8>::from_slice(data);
            let decoded = imdecode(&encoded, IMREAD_COLOR)?;
            if decoded.empty() {
                return Err(CaptureError::Device("undecodable MJPG frame".to_string()));
            }
            *frame = FrameBuffer::from_mat(decoded);
        }
        FormatFamily::Rgb24 => {
            let Resolution { width, height } = media.resolution();
            let row = width as usize * 3;
            let stride = stride.max(row);
            let expected = match height as usize {
                0 => 0,
                rows => stride * (rows - 1) + row,
            };
            if data.len() < expected {
                return Err(CaptureError::Device(format!(
                    "short RGB24 frame: {} of {} bytes",
                    data.len(),
                    expected
                )));
            }
            let mut rgb = Mat::new_rows_cols_with_default(
                height as i32,
                width as i32,
                CV_8UC3,
                Scalar::all(0.0),
            )?;
            if row > 0 {
                for (y, line) in rgb.data_bytes_mut()?.chunks_exact_mut(row).enumerate() {
                    let start = y * stride;
                    line.copy_from_slice(&data[start..start + row]);
                }
            }
            cvt_color_def(&rgb, frame.mat_mut(), COLOR_RGB2BGR)?;
        }
        FormatFamily::Unsupported => {
            return Err(CaptureError::Device(format!("cannot decode {}", media)));
        }
    }
    Ok(())
}
