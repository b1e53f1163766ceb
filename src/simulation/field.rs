//! Navigation field: one planar flow vector per grid cell.
//!
//! Cells are addressed as `(x, y)` and flattened row-major as
//! `y * width + x`. The field is stored as an `Array3` of shape
//! `[height, width, 2]`.
//!
//! A persisted field that does not match the current grid is never an error;
//! the field falls back to the default vector and the mismatch is logged.

use std::path::Path;

use chrono::Utc;
use ndarray::{Array1, Array3, s};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{Result, SimError};
use super::geometric_utils::{clamp_magnitude_mut, magnitude};
use super::params::GridParams;

/// Vector every cell starts with: straight upstream.
pub const DEFAULT_FIELD_VECTOR: [f32; 2] = [0.0, 1.0];

/// Format version written into saved fields.
pub const FIELD_RECORD_VERSION: u32 = 1;

/// Serialized form of a navigation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Name given when the field was saved.
    pub name: String,
    /// Format version.
    pub version: u32,
    /// Number of cells along x.
    pub width: usize,
    /// Number of cells along y.
    pub height: usize,
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
    /// Row-major `[x, y]` vectors, `width * height` entries.
    pub vectors: Vec<[f32; 2]>,
}

/// Flow field covering the play area.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationField {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: [f32; 2],
    limit_vectors_to_cell: bool,
    vectors: Array3<f32>,
}

impl NavigationField {
    /// Creates a field filled with [`DEFAULT_FIELD_VECTOR`].
    pub fn new(grid: &GridParams) -> Self {
        let mut field = Self {
            width: grid.width,
            height: grid.height,
            cell_size: grid.cell_size,
            origin: grid.origin,
            limit_vectors_to_cell: grid.limit_vectors_to_cell,
            vectors: Array3::zeros((grid.height, grid.width, 2)),
        };
        field.reset();
        field
    }

    /// Number of cells along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// World length of one cell side.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Returns true if the field was built for the given grid.
    pub fn matches(&self, grid: &GridParams) -> bool {
        self.width == grid.width && self.height == grid.height
    }

    /// Fills every cell with the default vector.
    pub fn reset(&mut self) {
        self.vectors.slice_mut(s![.., .., 0]).fill(DEFAULT_FIELD_VECTOR[0]);
        self.vectors.slice_mut(s![.., .., 1]).fill(DEFAULT_FIELD_VECTOR[1]);
    }

    /// Grid cell containing a world position.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the position lies outside the grid.
    pub fn cell_of(&self, world: &Array1<f32>) -> Result<(usize, usize)> {
        let out_of_bounds = || SimError::OutOfBounds {
            x: world[0],
            y: world[1],
        };
        let fx = ((world[0] - self.origin[0]) / self.cell_size).floor();
        let fy = ((world[1] - self.origin[1]) / self.cell_size).floor();
        if !fx.is_finite() || !fy.is_finite() || fx < 0.0 || fy < 0.0 {
            return Err(out_of_bounds());
        }
        let (x, y) = (fx as usize, fy as usize);
        if x >= self.width || y >= self.height {
            return Err(out_of_bounds());
        }
        Ok((x, y))
    }

    /// Flow vector of the cell containing a world position.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the position lies outside the grid.
    pub fn vector_at(&self, world: &Array1<f32>) -> Result<Array1<f32>> {
        let (x, y) = self.cell_of(world)?;
        Ok(self.vectors.slice(s![y, x, ..]).to_owned())
    }

    /// Flow vector of a cell, or `None` outside the grid.
    pub fn vector(&self, x: usize, y: usize) -> Option<[f32; 2]> {
        (x < self.width && y < self.height)
            .then(|| [self.vectors[[y, x, 0]], self.vectors[[y, x, 1]]])
    }

    /// Overwrites the vector of one cell.
    ///
    /// With `limit_vectors_to_cell` set, vectors longer than one cell are
    /// shortened to the cell size.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the cell is outside the grid.
    pub fn set_vector(&mut self, x: usize, y: usize, vector: [f32; 2]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(SimError::OutOfBounds {
                x: x as f32,
                y: y as f32,
            });
        }
        let mut v = Array1::from_vec(vector.to_vec());
        if self.limit_vectors_to_cell {
            clamp_magnitude_mut(&mut v, self.cell_size);
        }
        self.vectors.slice_mut(s![y, x, ..]).assign(&v);
        Ok(())
    }

    /// Row-major index of a cell.
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell coordinates of a row-major index.
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// World position of a cell's center.
    pub fn cell_center_world(&self, x: usize, y: usize) -> Array1<f32> {
        Array1::from_vec(vec![
            self.origin[0] + (x as f32 + 0.5) * self.cell_size,
            self.origin[1] + (y as f32 + 0.5) * self.cell_size,
        ])
    }

    /// Length of the longest vector in the field.
    pub fn max_magnitude(&self) -> f32 {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| magnitude(&self.vectors.slice(s![y, x, ..]).to_owned()))
            .fold(0.0, f32::max)
    }

    /// Serializable snapshot of the field.
    pub fn to_record(&self, name: &str) -> FieldRecord {
        let vectors = (0..self.width * self.height)
            .map(|index| {
                let (x, y) = self.coords_of(index);
                [self.vectors[[y, x, 0]], self.vectors[[y, x, 1]]]
            })
            .collect();

        FieldRecord {
            name: name.to_string(),
            version: FIELD_RECORD_VERSION,
            width: self.width,
            height: self.height,
            saved_at: Utc::now().to_rfc3339(),
            vectors,
        }
    }

    /// Rebuilds a field from a record for the given grid.
    ///
    /// A record of the wrong version, the wrong dimensions or the wrong
    /// number of vectors yields the default field.
    pub fn from_record(record: &FieldRecord, grid: &GridParams) -> Self {
        let mut field = Self::new(grid);

        let problem = if record.version != FIELD_RECORD_VERSION {
            Some(format!("unsupported version {}", record.version))
        } else if record.width != grid.width || record.height != grid.height {
            Some(format!(
                "size {}x{} does not match grid {}x{}",
                record.width, record.height, grid.width, grid.height
            ))
        } else if record.vectors.len() != grid.width * grid.height {
            Some(format!(
                "{} vectors for {} cells",
                record.vectors.len(),
                grid.width * grid.height
            ))
        } else {
            None
        };

        if let Some(problem) = problem {
            warn!(name = %record.name, "discarding saved field: {problem}");
            return field;
        }

        for (index, vector) in record.vectors.iter().enumerate() {
            let (x, y) = field.coords_of(index);
            field.vectors[[y, x, 0]] = vector[0];
            field.vectors[[y, x, 1]] = vector[1];
        }
        field
    }

    /// Writes the field as JSON.
    pub fn save_to_file(&self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_record(name))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a field from JSON, falling back to the default field on any
    /// read or parse failure.
    pub fn load_or_default(path: impl AsRef<Path>, grid: &GridParams) -> Self {
        let path = path.as_ref();
        let record = std::fs::read_to_string(path)
            .map_err(SimError::from)
            .and_then(|json| serde_json::from_str::<FieldRecord>(&json).map_err(SimError::from));

        match record {
            Ok(record) => {
                info!(path = %path.display(), name = %record.name, "loaded navigation field");
                Self::from_record(&record, grid)
            }
            Err(err) => {
                warn!(path = %path.display(), "using default navigation field: {err}");
                Self::new(grid)
            }
        }
    }
}
