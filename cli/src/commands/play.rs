//! `facecap play`

use crate::cli::PlayArgs;
use crate::config::CaptureConfig;
use crate::error::Result;
use capture::{CaptureSession, LiveConfig, VideoSource};
use logging::Logger;

/// Summary printed after a playback run
#[derive(Debug, Clone, PartialEq)]
pub struct PlayReport {
    pub frames: u64,
    /// Native rate, file sessions only
    pub frame_rate: Option<f64>,
    pub grayscale_size: Option<(i32, i32)>,
    /// False when the frame limit stopped the run
    pub reached_end: bool,
}

impl std::fmt::Display for PlayReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frames read: {}", self.frames)?;
        if let Some(fps) = self.frame_rate {
            write!(f, ", frame rate: {:.2} fps", fps)?;
        }
        match self.grayscale_size {
            Some((w, h)) => write!(f, ", grayscale: {}x{}", w, h)?,
            None => write!(f, ", grayscale: none")?,
        }
        if self.reached_end {
            write!(f, " (end of stream)")?;
        }
        Ok(())
    }
}

pub fn run(args: &PlayArgs, defaults: &CaptureConfig, logger: &Logger) -> Result<()> {
    let session_logger = logger.for_component("Session");

    let report = if let Some(path) = &args.file {
        let mut session = CaptureSession::open_file(path, session_logger)?;
        pull_frames(&mut session, args.frames)?
    } else {
        let config = live_config(args, defaults)?;
        let mut session = CaptureSession::open_live(&config, session_logger)?;
        pull_frames(&mut session, args.frames)?
    };

    logger.info(&format!("Playback finished: {}", report));
    println!("{}", report);
    Ok(())
}

/// Command-line values override the configured capture defaults.
pub fn live_config(args: &PlayArgs, defaults: &CaptureConfig) -> Result<LiveConfig> {
    let index = args.device.unwrap_or(defaults.device_index);
    let width = args.width.unwrap_or(defaults.width);
    let height = args.height.unwrap_or(defaults.height);
    Ok(LiveConfig::new(index)?.with_resolution(width, height)?)
}

/// Pulls frames until the source runs dry or `limit` frames were read.
pub fn pull_frames<S: VideoSource>(
    session: &mut CaptureSession<S>,
    limit: Option<u64>,
) -> Result<PlayReport> {
    let mut frames = 0u64;
    let mut reached_end = false;

    while limit.is_none_or(|max| frames < max) {
        match session.get_next_frame() {
            Ok(_) => frames += 1,
            Err(e) if e.is_capture_failure() => {
                reached_end = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let report = PlayReport {
        frames,
        frame_rate: session.frame_rate(),
        grayscale_size: session.grayscale_frame().map(|gray| gray.size()),
        reached_end,
    };
    session.close();
    Ok(report)
}
