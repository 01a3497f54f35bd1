//! Capture sessions.
//!
//! A session owns one open source and three buffers: the raw decode target,
//! the orientation-corrected latest frame and a grayscale copy of it. All
//! three are overwritten in place on every pull; callers that need a frame
//! past the next pull must copy it.

use super::config::LiveConfig;
use super::source::{OpenCvSource, VideoSource};
use crate::constants::logging::FRAME_LOG_INTERVAL;
use crate::error::{CaptureError, Result};
use crate::frame::{FrameBuffer, PixelFormat, copy_into, mirror_horizontal, to_grayscale};
use logging::Logger;
use std::path::{Path, PathBuf};

/// What a session reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// Webcam. Frames are mirrored so the picture behaves like a mirror.
    Live { device_index: u32 },
    /// Video file. Frames pass through unchanged.
    File { path: PathBuf, frame_rate: f64 },
}

impl SourceKind {
    pub fn is_live(&self) -> bool {
        matches!(self, SourceKind::Live { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Frame pipeline over one video source.
pub struct CaptureSession<S: VideoSource = OpenCvSource> {
    source: S,
    kind: SourceKind,
    state: SessionState,
    raw: FrameBuffer,
    latest: FrameBuffer,
    gray: Option<FrameBuffer>,
    frames_read: u64,
    logger: Logger,
}

impl CaptureSession<OpenCvSource> {
    /// Opens a live camera session with the configured hints.
    pub fn open_live(config: &LiveConfig, logger: Logger) -> Result<Self> {
        logger.info(&format!("Opening camera {}", config.device_index));
        let source = OpenCvSource::open_device(config.backend_index())?;
        Self::live(source, config, logger)
    }

    /// Opens camera `device_index` and asks for `width`x`height`.
    pub fn open_live_at(device_index: u32, width: u32, height: u32, logger: Logger) -> Result<Self> {
        let config = LiveConfig::new(device_index)?.with_resolution(width, height)?;
        Self::open_live(&config, logger)
    }

    /// Opens a video file session.
    pub fn open_file(path: impl AsRef<Path>, logger: Logger) -> Result<Self> {
        let path = path.as_ref();
        logger.info(&format!("Opening video file {}", path.display()));
        let source = OpenCvSource::open_file(path)?;
        Self::file(source, path.to_path_buf(), logger)
    }
}

impl<S: VideoSource> CaptureSession<S> {
    /// Wraps an already opened live source. Resolution hints are applied
    /// best-effort; the size the backend settles on is logged.
    pub fn live(mut source: S, config: &LiveConfig, logger: Logger) -> Result<Self> {
        if !source.is_opened() {
            return Err(CaptureError::NotOpen);
        }

        if let Some(requested) = config.resolution() {
            if let Err(e) = source.set_resolution(requested.width, requested.height) {
                logger.warn(&format!("Could not request {}: {}", requested, e));
            }
            let (width, height) = source.resolution();
            if (width, height) != (requested.width, requested.height) {
                logger.warn(&format!(
                    "Requested {}, camera reports {}x{}",
                    requested, width, height
                ));
            }
        }

        logger.info(&format!("Camera {} open", config.device_index));
        Ok(Self::assemble(
            source,
            SourceKind::Live {
                device_index: config.device_index,
            },
            logger,
        ))
    }

    /// Wraps an already opened file source and records its frame rate.
    pub fn file(source: S, path: PathBuf, logger: Logger) -> Result<Self> {
        if !source.is_opened() {
            return Err(CaptureError::NotOpen);
        }
        let frame_rate = source.frame_rate()?;
        logger.info(&format!(
            "Video file {} open at {:.2} fps",
            path.display(),
            frame_rate
        ));
        Ok(Self::assemble(
            source,
            SourceKind::File { path, frame_rate },
            logger,
        ))
    }

    fn assemble(source: S, kind: SourceKind, logger: Logger) -> Self {
        Self {
            source,
            kind,
            state: SessionState::Open,
            raw: FrameBuffer::empty(),
            latest: FrameBuffer::empty(),
            gray: None,
            frames_read: 0,
            logger,
        }
    }

    /// Pulls the next frame and returns the orientation-corrected result.
    ///
    /// # Returns
    /// * `Ok(&FrameBuffer)` - The latest frame; overwritten by the next call
    /// * `Err(CaptureError::CaptureFailed)` - No frame was available. The
    ///   previously returned frame is left untouched and the session should
    ///   be considered finished.
    /// * `Err(CaptureError::GeometryChanged)` - The source switched
    ///   resolution mid-session
    /// * `Err(CaptureError::NotOpen)` - The session was closed
    pub fn get_next_frame(&mut self) -> Result<&FrameBuffer> {
        if self.state != SessionState::Open {
            return Err(CaptureError::NotOpen);
        }

        match self.source.read(&mut self.raw) {
            Ok(true) => {}
            Ok(false) => return Err(CaptureError::CaptureFailed),
            Err(e) => {
                self.logger.warn(&format!("Frame read failed: {}", e));
                return Err(CaptureError::CaptureFailed);
            }
        }

        if let Some(gray) = &self.gray
            && !self.raw.is_empty()
            && self.raw.size() != gray.size()
        {
            let (expected_width, expected_height) = gray.size();
            let (width, height) = self.raw.size();
            return Err(CaptureError::GeometryChanged {
                expected_width,
                expected_height,
                width,
                height,
            });
        }

        if self.kind.is_live() {
            mirror_horizontal(&self.raw, &mut self.latest)?;
        } else {
            copy_into(&self.raw, &mut self.latest)?;
        }

        if self.gray.is_none() && self.latest.width() > 0 {
            let gray = FrameBuffer::new(self.latest.width(), self.latest.height(), PixelFormat::Gray8)?;
            self.logger.debug(&format!(
                "Allocated {}x{} grayscale buffer",
                gray.width(),
                gray.height()
            ));
            self.gray = Some(gray);
        }

        if let Some(gray) = self.gray.as_mut()
            && !self.latest.is_empty()
        {
            to_grayscale(&self.latest, gray)?;
        }

        self.frames_read += 1;
        if self.frames_read % FRAME_LOG_INTERVAL == 0 {
            self.logger
                .debug(&format!("Read {} frames", self.frames_read));
        }

        Ok(&self.latest)
    }

    /// Most recent frame, `None` before the first successful pull.
    pub fn latest_frame(&self) -> Option<&FrameBuffer> {
        if self.frames_read == 0 {
            None
        } else {
            Some(&self.latest)
        }
    }

    /// Grayscale copy of the latest frame, `None` until a frame with a
    /// non-zero width has been read.
    pub fn grayscale_frame(&self) -> Option<&FrameBuffer> {
        self.gray.as_ref()
    }

    /// Native frame rate of a file-backed session.
    pub fn frame_rate(&self) -> Option<f64> {
        match &self.kind {
            SourceKind::File { frame_rate, .. } => Some(*frame_rate),
            SourceKind::Live { .. } => None,
        }
    }

    pub fn is_opened(&self) -> bool {
        self.state == SessionState::Open && self.source.is_opened()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Releases the source. Later calls do nothing; release failures are
    /// logged and swallowed.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;

        if let Err(e) = self.source.release() {
            self.logger
                .warn(&format!("Failed to release capture source: {}", e));
        }
        self.logger.info(&format!(
            "Capture session closed after {} frames",
            self.frames_read
        ));
    }
}

impl<S: VideoSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}
