//! Face appearance analyser.
//!
//! Every frame goes through three backend steps: the face is warped onto a
//! canonical mask using the tracked landmarks and the triangulation
//! template, a Felzenszwalb HOG descriptor is extracted from the aligned
//! face, and the descriptor is rendered for display. The results of the
//! last successful frame are kept until the next one replaces them.

use crate::error::Result;
use crate::landmarks::{LandmarkEngine, Tracker};
use crate::triangulation::Triangulation;
use capture::FrameBuffer;
use logging::Logger;
use std::path::Path;

/// Cell size, in pixels, of the HOG grid
pub const HOG_CELL_SIZE: u32 = 8;

/// HOG feature grid of one aligned face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HogDescriptor {
    /// Row-major cell features
    pub values: Vec<f64>,
    pub num_rows: usize,
    pub num_cols: usize,
}

impl HogDescriptor {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Features per cell, 0 for an empty descriptor.
    pub fn cell_len(&self) -> usize {
        let cells = self.num_rows * self.num_cols;
        if cells == 0 { 0 } else { self.values.len() / cells }
    }
}

/// Opaque alignment and descriptor routines.
pub trait FaceDescriptorBackend {
    /// Warps the tracked face onto a `width`x`height` canonical mask.
    #[allow(clippy::too_many_arguments)]
    fn align_face_mask<E: LandmarkEngine>(
        &mut self,
        frame: &FrameBuffer,
        engine: &E,
        triangulation: &Triangulation,
        rigid: bool,
        scale: f64,
        width: u32,
        height: u32,
    ) -> Result<FrameBuffer>;

    fn extract_fhog(&mut self, aligned_face: &FrameBuffer, cell_size: u32) -> Result<HogDescriptor>;

    fn visualise_fhog(&mut self, descriptor: &HogDescriptor) -> Result<FrameBuffer>;
}

pub struct FaceAnalyser<B: FaceDescriptorBackend> {
    backend: B,
    triangulation: Triangulation,
    aligned_face: FrameBuffer,
    descriptor: HogDescriptor,
    visualisation: FrameBuffer,
    frames: u64,
    logger: Logger,
}

impl<B: FaceDescriptorBackend> FaceAnalyser<B> {
    /// Loads the triangulation template and wraps `backend`.
    ///
    /// # Returns
    /// * `Err(TrackerError::TriangulationMissing)` - The template cannot be read
    /// * `Err(TrackerError::TriangulationMalformed)` - The template is corrupt
    pub fn new(backend: B, triangulation_path: impl AsRef<Path>, logger: Logger) -> Result<Self> {
        let path = triangulation_path.as_ref();
        let triangulation = Triangulation::load(path).inspect_err(|e| {
            logger.error(&format!("Face analyser unavailable: {}", e));
        })?;
        logger.info(&format!(
            "Loaded {} triangles from {}",
            triangulation.len(),
            path.display()
        ));
        Ok(Self::with_triangulation(backend, triangulation, logger))
    }

    pub fn with_triangulation(backend: B, triangulation: Triangulation, logger: Logger) -> Self {
        Self {
            backend,
            triangulation,
            aligned_face: FrameBuffer::empty(),
            descriptor: HogDescriptor::default(),
            visualisation: FrameBuffer::empty(),
            frames: 0,
            logger,
        }
    }

    /// Aligns the tracked face of `frame`, extracts its descriptor and
    /// renders the visualisation. On error the previous results are kept.
    pub fn add_next_frame<E: LandmarkEngine>(
        &mut self,
        frame: &FrameBuffer,
        tracker: &Tracker<E>,
        scale: f64,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let aligned = self.backend.align_face_mask(
            frame,
            tracker.engine(),
            &self.triangulation,
            true,
            scale,
            width,
            height,
        )?;
        let descriptor = self.backend.extract_fhog(&aligned, HOG_CELL_SIZE)?;
        let visualisation = self.backend.visualise_fhog(&descriptor)?;

        self.aligned_face = aligned;
        self.descriptor = descriptor;
        self.visualisation = visualisation;
        self.frames += 1;
        self.logger.debug(&format!(
            "Frame {}: {}x{} HOG cells",
            self.frames, self.descriptor.num_rows, self.descriptor.num_cols
        ));
        Ok(())
    }

    pub fn latest_aligned_face(&self) -> &FrameBuffer {
        &self.aligned_face
    }

    pub fn latest_hog_visualisation(&self) -> &FrameBuffer {
        &self.visualisation
    }

    pub fn latest_descriptor(&self) -> &HogDescriptor {
        &self.descriptor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    pub fn frames_analysed(&self) -> u64 {
        self.frames
    }
}
