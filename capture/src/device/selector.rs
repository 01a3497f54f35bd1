//! Tiered format/resolution preference and preview capture.
//!
//! MJPG wins outright: when a device reports any MJPG size, RGB24 is never
//! looked at. Within the winning family the resolutions are walked in
//! ascending order; every one is listed and the first that reaches 640x480
//! becomes the chosen format. The preview is grabbed at the chosen size
//! after a few warm-up frames and mirrored.

use super::catalog::MediaTypeCatalog;
use super::media_type::{FormatFamily, MediaType, Resolution};
use super::traits::PhysicalDevice;
use crate::constants::selection::WARMUP_FRAMES;
use crate::error::{CaptureError, Result};
use crate::frame::{FrameBuffer, mirrored};
use crate::session::VideoSource;
use logging::Logger;

/// Outcome of running the policy against one device.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Family the resolutions were taken from, `None` when the catalog was empty
    pub family: Option<FormatFamily>,
    /// Every resolution of the winning family, ascending
    pub resolutions: Vec<Resolution>,
    /// First resolution meeting the floor
    pub chosen: Option<Resolution>,
    /// Mirrored still at `chosen`; empty when nothing was chosen or the
    /// capture failed
    pub preview: FrameBuffer,
}

/// Walks `resolutions` in order, listing all of them and latching the first
/// one that meets the selection floor.
pub fn walk_resolutions<I>(resolutions: I) -> (Vec<Resolution>, Option<Resolution>)
where
    I: IntoIterator<Item = Resolution>,
{
    let mut listed = Vec::new();
    let mut chosen = None;
    for resolution in resolutions {
        if chosen.is_none() && resolution.meets_floor() {
            chosen = Some(resolution);
        }
        listed.push(resolution);
    }
    (listed, chosen)
}

/// Applies the preference policy and captures previews.
pub struct ResolutionSelector {
    logger: Logger,
    warmup_frames: usize,
}

impl ResolutionSelector {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            warmup_frames: WARMUP_FRAMES,
        }
    }

    /// Overrides how many frames are thrown away before the preview shot.
    pub fn with_warmup_frames(mut self, frames: usize) -> Self {
        self.warmup_frames = frames;
        self
    }

    pub fn warmup_frames(&self) -> usize {
        self.warmup_frames
    }

    /// Runs the policy for an active device.
    ///
    /// Preview failures are logged and leave the preview empty; the listed
    /// resolutions and the chosen one are kept.
    pub fn select<D: PhysicalDevice>(
        &self,
        device: &mut D,
        catalog: &MediaTypeCatalog,
    ) -> Selection {
        let family = if catalog.has_mjpg() {
            FormatFamily::Mjpg
        } else if catalog.rgb24().next().is_some() {
            FormatFamily::Rgb24
        } else {
            self.logger
                .debug(&format!("{}: no MJPG or RGB24 media types", device.name()));
            return Selection::default();
        };

        let (resolutions, chosen) = walk_resolutions(catalog.family(family));

        let Some(resolution) = chosen else {
            self.logger.debug(&format!(
                "{}: no {} resolution reaches the floor, skipping preview",
                device.name(),
                family
            ));
            return Selection {
                family: Some(family),
                resolutions,
                chosen: None,
                preview: FrameBuffer::empty(),
            };
        };

        self.logger.debug(&format!(
            "{}: chose {} {} out of {} candidates",
            device.name(),
            family,
            resolution,
            resolutions.len()
        ));

        let captured = match family {
            FormatFamily::Rgb24 => self.capture_with_probe(device, resolution),
            _ => self.capture_from_device(device, MediaType::new(family, resolution)),
        };
        let preview = captured.unwrap_or_else(|e| {
            self.logger.warn(&format!(
                "{}: preview capture at {} failed: {}",
                device.name(),
                resolution,
                e
            ));
            FrameBuffer::empty()
        });

        Selection {
            family: Some(family),
            resolutions,
            chosen: Some(resolution),
            preview,
        }
    }

    fn capture_from_device<D: PhysicalDevice>(
        &self,
        device: &mut D,
        media: MediaType,
    ) -> Result<FrameBuffer> {
        device.set_media_type(media)?;
        self.grab_preview(|frame| device.read_frame(frame))
    }

    fn capture_with_probe<D: PhysicalDevice>(
        &self,
        device: &D,
        resolution: Resolution,
    ) -> Result<FrameBuffer> {
        let mut probe = device.open_probe(resolution)?;
        let preview = self.grab_preview(|frame| {
            if probe.read(frame)? {
                Ok(())
            } else {
                Err(CaptureError::CaptureFailed)
            }
        });
        if let Err(e) = probe.release() {
            self.logger
                .warn(&format!("{}: failed to release probe: {}", device.name(), e));
        }
        preview
    }

    /// Discards the warm-up frames, then reads and mirrors one more.
    fn grab_preview<F>(&self, mut read: F) -> Result<FrameBuffer>
    where
        F: FnMut(&mut FrameBuffer) -> Result<()>,
    {
        let mut frame = FrameBuffer::empty();
        for _ in 0..self.warmup_frames {
            read(&mut frame)?;
        }
        read(&mut frame)?;
        if frame.is_empty() {
            return Err(CaptureError::CaptureFailed);
        }
        mirrored(&frame)
    }
}
