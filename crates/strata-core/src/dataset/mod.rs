//! Dataset loading and field metadata
//!
//! Startup inputs are an unstructured grid (FEM results with named
//! point/cell arrays), a surveyed OBJ site model, and a texture image. All
//! three are read once, synchronously, and are immutable afterwards.

mod legacy_vtk;
mod obj;

pub use legacy_vtk::{parse_legacy_vtk, read_legacy_vtk};
pub use obj::{parse_obj, read_obj, read_texture, FaceVertex, SurfaceModel, Texture};

use std::path::PathBuf;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::Bounds;

/// Whether a data array is attached to the dataset's points or cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldAssociation {
    Point,
    Cell,
}

impl FieldAssociation {
    pub fn label(self) -> &'static str {
        match self {
            FieldAssociation::Point => "point",
            FieldAssociation::Cell => "cell",
        }
    }
}

/// A named data array attached to the grid's points or cells.
///
/// Values are stored flat, `num_tuples * components` long.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: String,
    pub components: usize,
    pub values: Vec<f64>,
}

impl DataArray {
    pub fn num_tuples(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.values.len() / self.components
        }
    }

    pub fn tuple(&self, index: usize) -> &[f64] {
        let start = index * self.components;
        &self.values[start..start + self.components]
    }

    /// Range of the first component, the one used for scalar coloring.
    /// An empty array yields the unit range.
    pub fn range(&self) -> (f64, f64) {
        let mut iter = self.values.iter().step_by(self.components.max(1));
        let Some(&first) = iter.next() else {
            return (0.0, 1.0);
        };
        let mut min = first;
        let mut max = first;
        for &v in iter {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }
}

/// Load-time metadata for one selectable field.
///
/// Descriptors are built once from the grid's field catalog and are
/// read-only afterwards; the index is the field's position in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub index: usize,
    pub range: (f64, f64),
    pub association: FieldAssociation,
}

/// An unstructured grid: points, cells as vertex index lists, and named
/// data arrays per association
#[derive(Debug, Clone, Default)]
pub struct UnstructuredGrid {
    pub points: Vec<DVec3>,
    pub cells: Vec<Vec<usize>>,
    pub point_arrays: Vec<DataArray>,
    pub cell_arrays: Vec<DataArray>,
}

impl UnstructuredGrid {
    /// Enumerate all selectable fields: point arrays first, then cell
    /// arrays, with a running index.
    pub fn field_catalog(&self) -> Vec<FieldDescriptor> {
        self.point_arrays
            .iter()
            .map(|a| (a, FieldAssociation::Point))
            .chain(self.cell_arrays.iter().map(|a| (a, FieldAssociation::Cell)))
            .enumerate()
            .map(|(index, (array, association))| FieldDescriptor {
                name: array.name.clone(),
                index,
                range: array.range(),
                association,
            })
            .collect()
    }

    pub fn point_array(&self, name: &str) -> Option<&DataArray> {
        self.point_arrays.iter().find(|a| a.name == name)
    }

    pub fn cell_array(&self, name: &str) -> Option<&DataArray> {
        self.cell_arrays.iter().find(|a| a.name == name)
    }

    pub fn array(&self, name: &str, association: FieldAssociation) -> Option<&DataArray> {
        match association {
            FieldAssociation::Point => self.point_array(name),
            FieldAssociation::Cell => self.cell_array(name),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().copied())
    }
}

/// Dataset loading errors
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported dataset type '{0}'")]
    UnsupportedDataset(String),
}

impl DatasetError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        DatasetError::Parse {
            line,
            message: message.into(),
        }
    }
}
