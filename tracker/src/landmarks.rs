//! Landmark tracker facade.
//!
//! The detection model and its fitting loop live behind [`LandmarkEngine`].
//! [`Tracker`] forwards to it and reshapes the results into plain values.

use capture::FrameBuffer;

/// Default location of the landmark model, relative to the working directory.
pub const DEFAULT_MODEL_LOCATION: &str = "model/main_ccnf_general.txt";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Head pose: translation in millimetres followed by rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose(pub [f64; 6]);

impl Pose {
    pub fn translation(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Euler angles around x, y and z
    pub fn rotation(&self) -> [f64; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Pinhole camera parameters used to project the 3D shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    pub const fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Estimate for an uncalibrated camera: a focal length of 500 scaled
    /// from a 640x480 reference (averaged over both axes) and the optical
    /// centre in the middle of the frame.
    pub fn from_frame_size(width: u32, height: u32) -> Self {
        let fx = 500.0 * f64::from(width) / 640.0;
        let fy = 500.0 * f64::from(height) / 480.0;
        let focal = (fx + fy) / 2.0;
        Self {
            fx: focal,
            fy: focal,
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
        }
    }
}

/// Engine settings, carried by value into every engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerParameters {
    pub model_location: String,
    /// Run the detection validator after each fit
    pub validate_detections: bool,
    /// Validator score below which a detection is rejected
    pub validation_boundary: f64,
    /// Frames between re-detections once tracking is lost
    pub reinit_video_every: u32,
}

impl Default for TrackerParameters {
    fn default() -> Self {
        Self {
            model_location: DEFAULT_MODEL_LOCATION.to_string(),
            validate_detections: true,
            validation_boundary: -0.45,
            reinit_video_every: 4,
        }
    }
}

/// Opaque landmark detection and tracking model.
pub trait LandmarkEngine {
    /// Forgets the tracked face.
    fn reset(&mut self);

    /// Forgets the tracked face and restarts around `(x, y)`.
    fn reset_at(&mut self, x: f64, y: f64);

    /// Certainty of the current detection, lower is more certain.
    fn detection_certainty(&self) -> f64;

    /// Fits the model to the next frame of a sequence.
    fn detect_in_video(&mut self, frame: &FrameBuffer, params: &TrackerParameters) -> bool;

    fn corrected_pose_camera(&self, intrinsics: &CameraIntrinsics, params: &TrackerParameters) -> Pose;

    fn corrected_pose_camera_plane(
        &self,
        intrinsics: &CameraIntrinsics,
        params: &TrackerParameters,
    ) -> Pose;

    fn landmarks_2d(&self) -> Vec<Point2>;

    fn shape_3d(&self, intrinsics: &CameraIntrinsics) -> Vec<Point3>;

    /// Edges of a head-aligned box projected into the image.
    fn box_lines(&self, pose: &Pose, intrinsics: &CameraIntrinsics) -> Vec<(Point2, Point2)>;

    fn num_points(&self) -> usize;

    fn num_modes(&self) -> usize;

    /// Scale, rotation x/y/z, translation x/y
    fn global_params(&self) -> [f64; 6];

    /// Shape deformation coefficients
    fn local_params(&self) -> Vec<f64>;
}

/// Landmark tracker over an opaque engine.
pub struct Tracker<E: LandmarkEngine> {
    engine: E,
}

impl<E: LandmarkEngine> Tracker<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn reset_at(&mut self, x: f64, y: f64) {
        self.engine.reset_at(x, y);
    }

    pub fn confidence(&self) -> f64 {
        self.engine.detection_certainty()
    }

    /// Tracks landmarks on the next video frame. An empty frame is never
    /// handed to the engine and counts as a failed detection.
    pub fn detect_landmarks_in_video(&mut self, frame: &FrameBuffer, params: &TrackerParameters) -> bool {
        if frame.is_empty() {
            return false;
        }
        self.engine.detect_in_video(frame, params)
    }

    pub fn corrected_pose_camera(&self, intrinsics: &CameraIntrinsics, params: &TrackerParameters) -> Pose {
        self.engine.corrected_pose_camera(intrinsics, params)
    }

    pub fn corrected_pose_camera_plane(
        &self,
        intrinsics: &CameraIntrinsics,
        params: &TrackerParameters,
    ) -> Pose {
        self.engine.corrected_pose_camera_plane(intrinsics, params)
    }

    pub fn landmarks(&self) -> Vec<Point2> {
        self.engine.landmarks_2d()
    }

    pub fn landmarks_3d(&self, intrinsics: &CameraIntrinsics) -> Vec<Point3> {
        self.engine.shape_3d(intrinsics)
    }

    /// Head box lines for the camera-plane pose computed with default
    /// parameters.
    pub fn pose_box(&self, intrinsics: &CameraIntrinsics) -> Vec<(Point2, Point2)> {
        let pose = self
            .engine
            .corrected_pose_camera_plane(intrinsics, &TrackerParameters::default());
        self.engine.box_lines(&pose, intrinsics)
    }

    pub fn num_points(&self) -> usize {
        self.engine.num_points()
    }

    pub fn num_modes(&self) -> usize {
        self.engine.num_modes()
    }

    pub fn rigid_params(&self) -> [f64; 6] {
        self.engine.global_params()
    }

    pub fn non_rigid_params(&self) -> Vec<f64> {
        self.engine.local_params()
    }

    /// Rigid parameters followed by the non-rigid ones.
    pub fn params(&self) -> Vec<f64> {
        let mut all = self.rigid_params().to_vec();
        all.extend(self.non_rigid_params());
        all
    }
}
