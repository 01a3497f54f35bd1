//! Scripted devices and sources shared by the integration tests.
#![allow(dead_code)]

use capture::{
    CaptureError, DeviceDriver, FormatFamily, FrameBuffer, MediaType, PhysicalDevice, Resolution,
    Result, VideoSource,
};
use logging::{LogLevel, Logger};
use opencv::core::{CV_8UC3, Mat, Scalar, Vec3b};
use opencv::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tempfile::TempDir;

pub fn test_logger() -> (Logger, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(dir.path().join("capture.log"), LogLevel::Debug).unwrap();
    (logger, dir)
}

pub fn mt(family: FormatFamily, width: u32, height: u32) -> MediaType {
    MediaType::new(family, Resolution::new(width, height))
}

/// BGR frame filled with `value`, except column 0 which is white. Makes the
/// frame index and the orientation readable back from the pixels.
pub fn patterned_frame(width: i32, height: i32, value: u8) -> FrameBuffer {
    let mut mat =
        Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(f64::from(value)))
            .unwrap();
    for row in 0..height {
        *mat.at_2d_mut::<Vec3b>(row, 0).unwrap() = Vec3b::from([255, 255, 255]);
    }
    FrameBuffer::from_mat(mat)
}

pub fn pixel(frame: &FrameBuffer, row: i32, col: i32) -> [u8; 3] {
    let px = frame.mat().at_2d::<Vec3b>(row, col).unwrap();
    [px[0], px[1], px[2]]
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Activated(String),
    Deactivated(String),
    MediaTypesQueried(String),
    MediaTypeSet(String, MediaType),
    FrameRead(String),
    ProbeOpened(String, Resolution),
    ProbeRead,
    ProbeReleased,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn count(log: &EventLog, pred: impl Fn(&Event) -> bool) -> usize {
    log.borrow().iter().filter(|e| pred(e)).count()
}

/// In-memory camera. Every frame read from it is a `patterned_frame` at the
/// configured resolution whose fill value is the number of frames served
/// before it.
#[derive(Clone)]
pub struct ScriptedDevice {
    pub name: String,
    pub media: Vec<MediaType>,
    pub fail_activate: bool,
    pub fail_media_types: bool,
    pub fail_reads: bool,
    pub log: EventLog,
    configured: Option<MediaType>,
    served: u8,
    active: bool,
}

impl ScriptedDevice {
    pub fn new(name: &str, media: Vec<MediaType>, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            media,
            fail_activate: false,
            fail_media_types: false,
            fail_reads: false,
            log: log.clone(),
            configured: None,
            served: 0,
            active: false,
        }
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl PhysicalDevice for ScriptedDevice {
    type Probe = ScriptedSource;

    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self) -> Result<()> {
        if self.fail_activate {
            return Err(CaptureError::Device("device busy".to_string()));
        }
        self.active = true;
        self.record(Event::Activated(self.name.clone()));
        Ok(())
    }

    fn media_types(&self) -> Result<Vec<MediaType>> {
        assert!(self.active, "media types queried on an inactive device");
        self.record(Event::MediaTypesQueried(self.name.clone()));
        if self.fail_media_types {
            return Err(CaptureError::Device("enumeration ioctl failed".to_string()));
        }
        Ok(self.media.clone())
    }

    fn set_media_type(&mut self, media: MediaType) -> Result<()> {
        self.record(Event::MediaTypeSet(self.name.clone(), media));
        self.configured = Some(media);
        Ok(())
    }

    fn read_frame(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.record(Event::FrameRead(self.name.clone()));
        if self.fail_reads {
            return Err(CaptureError::Device("stream stalled".to_string()));
        }
        let media = self
            .configured
            .ok_or_else(|| CaptureError::Device("no format".to_string()))?;
        let res = media.resolution();
        *frame = patterned_frame(res.width as i32, res.height as i32, self.served);
        self.served += 1;
        Ok(())
    }

    fn open_probe(&self, resolution: Resolution) -> Result<ScriptedSource> {
        self.record(Event::ProbeOpened(self.name.clone(), resolution));
        let frames = (0..10u8)
            .map(|i| patterned_frame(resolution.width as i32, resolution.height as i32, i))
            .collect();
        Ok(ScriptedSource::new(frames).with_events(&self.log))
    }

    fn deactivate(&mut self) -> Result<()> {
        self.active = false;
        self.record(Event::Deactivated(self.name.clone()));
        Ok(())
    }
}

pub struct ScriptedDriver {
    pub devices: Option<Vec<ScriptedDevice>>,
}

impl ScriptedDriver {
    pub fn new(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            devices: Some(devices),
        }
    }

    pub fn failing() -> Self {
        Self { devices: None }
    }
}

impl DeviceDriver for ScriptedDriver {
    type Device = ScriptedDevice;

    fn devices(&self) -> Result<Vec<ScriptedDevice>> {
        self.devices
            .clone()
            .ok_or_else(|| CaptureError::Device("no video subsystem".to_string()))
    }
}

pub enum Step {
    Frame(FrameBuffer),
    Error,
}

/// Source that plays back a fixed list of frames, then reports end of stream.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    opened: bool,
    frame_rate: f64,
    fail_release: bool,
    pub releases: Rc<Cell<u32>>,
    pub requested: Rc<RefCell<Vec<(u32, u32)>>>,
    events: Option<EventLog>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<FrameBuffer>) -> Self {
        Self::from_steps(frames.into_iter().map(Step::Frame).collect())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            opened: true,
            frame_rate: 0.0,
            fail_release: false,
            releases: Rc::new(Cell::new(0)),
            requested: Rc::new(RefCell::new(Vec::new())),
            events: None,
        }
    }

    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = fps;
        self
    }

    pub fn closed(mut self) -> Self {
        self.opened = false;
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn with_events(mut self, log: &EventLog) -> Self {
        self.events = Some(log.clone());
        self
    }

    fn record(&self, event: Event) {
        if let Some(log) = &self.events {
            log.borrow_mut().push(event);
        }
    }
}

impl VideoSource for ScriptedSource {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> Result<bool> {
        self.record(Event::ProbeRead);
        match self.steps.pop_front() {
            Some(Step::Frame(next)) => {
                next.mat().copy_to(frame.mat_mut())?;
                Ok(true)
            }
            Some(Step::Error) => Err(CaptureError::Device("decoder error".to_string())),
            None => Ok(false),
        }
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> Result<()> {
        self.requested.borrow_mut().push((width, height));
        Ok(())
    }

    fn frame_rate(&self) -> Result<f64> {
        Ok(self.frame_rate)
    }

    fn release(&mut self) -> Result<()> {
        self.record(Event::ProbeReleased);
        self.releases.set(self.releases.get() + 1);
        self.opened = false;
        if self.fail_release {
            return Err(CaptureError::Device("release failed".to_string()));
        }
        Ok(())
    }
}
