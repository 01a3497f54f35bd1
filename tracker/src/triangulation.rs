//! Face mesh triangulation template.
//!
//! The template is a whitespace separated matrix dump: a header of row
//! count, column count and OpenCV type code, then `rows * cols` vertex
//! indices. Each row is one triangle, so the column count must be 3.

use crate::error::{Result, TrackerError};
use std::fs;
use std::path::Path;

/// Default location of the 68-point template, relative to the working directory.
pub const DEFAULT_TRIANGULATION_PATH: &str = "model/tris_68_full.txt";

const VERTICES_PER_TRIANGLE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangulation {
    triangles: Vec<[u32; 3]>,
}

impl Triangulation {
    /// Reads and parses a template file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TrackerError::TriangulationMissing {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses template text. `origin` names the source in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let malformed = |reason: String| TrackerError::TriangulationMalformed {
            origin: origin.to_string(),
            reason,
        };
        let mut tokens = content.split_whitespace();

        let mut header = |field: &str| -> Result<i64> {
            let token = tokens
                .next()
                .ok_or_else(|| malformed(format!("missing {} in header", field)))?;
            token
                .parse::<i64>()
                .map_err(|_| malformed(format!("{} is not an integer: {:?}", field, token)))
        };
        let rows = header("row count")?;
        let cols = header("column count")?;
        header("type code")?;

        if rows <= 0 {
            return Err(malformed(format!("row count must be positive, got {}", rows)));
        }
        if cols != VERTICES_PER_TRIANGLE as i64 {
            return Err(malformed(format!("expected 3 columns, got {}", cols)));
        }

        let rows = rows as usize;
        let mut triangles = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut triangle = [0u32; VERTICES_PER_TRIANGLE];
            for (col, vertex) in triangle.iter_mut().enumerate() {
                let token = tokens.next().ok_or_else(|| {
                    malformed(format!(
                        "truncated at row {} column {} of {}x3",
                        row, col, rows
                    ))
                })?;
                *vertex = token.parse::<u32>().map_err(|_| {
                    malformed(format!(
                        "row {} column {}: {:?} is not a vertex index",
                        row, col, token
                    ))
                })?;
            }
            triangles.push(triangle);
        }

        Ok(Self { triangles })
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Highest vertex index referenced by any triangle.
    pub fn max_vertex(&self) -> Option<u32> {
        self.triangles.iter().flatten().copied().max()
    }
}
