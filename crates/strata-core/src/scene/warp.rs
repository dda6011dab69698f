//! Warp-by-vector geometry filter
//!
//! Displaces grid points by a named point-data vector array scaled by a
//! factor. Executed once at setup and again whenever the scale changes.

use glam::DVec3;

use crate::dataset::UnstructuredGrid;

use super::SceneError;

#[derive(Debug, Clone)]
pub struct WarpVector {
    pub array_name: String,
    pub scale_factor: f64,
}

impl WarpVector {
    pub fn new(array_name: impl Into<String>, scale_factor: f64) -> Self {
        Self {
            array_name: array_name.into(),
            scale_factor,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Produce the displaced point set.
    ///
    /// Points past the end of the vector array keep their position; extra
    /// tuples are ignored.
    pub fn execute(&self, grid: &UnstructuredGrid) -> Result<Vec<DVec3>, SceneError> {
        let array = grid
            .point_array(&self.array_name)
            .ok_or_else(|| SceneError::MissingVectorArray(self.array_name.clone()))?;
        if array.components < 3 {
            return Err(SceneError::NotAVectorArray {
                name: array.name.clone(),
                components: array.components,
            });
        }

        let tuples = array.num_tuples();
        let displaced = grid
            .points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if i < tuples {
                    let t = array.tuple(i);
                    p + DVec3::new(t[0], t[1], t[2]) * self.scale_factor
                } else {
                    p
                }
            })
            .collect();
        Ok(displaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataArray;

    fn grid_with_displacement() -> UnstructuredGrid {
        UnstructuredGrid {
            points: vec![DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0)],
            cells: vec![vec![0, 1]],
            point_arrays: vec![DataArray {
                name: "Displacement".to_string(),
                components: 3,
                values: vec![0.0, 0.0, 0.5, 0.0, 0.0, -0.25],
            }],
            cell_arrays: Vec::new(),
        }
    }

    #[test]
    fn test_displacement_scaled() {
        let grid = grid_with_displacement();
        let warp = WarpVector::new("Displacement", 10.0);
        let warped = warp.execute(&grid).unwrap();
        assert_eq!(warped[0], DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(warped[1], DVec3::new(1.0, 0.0, -2.5));
    }

    #[test]
    fn test_zero_scale_is_identity() {
        let grid = grid_with_displacement();
        let warp = WarpVector::new("Displacement", 0.0);
        assert_eq!(warp.execute(&grid).unwrap(), grid.points);
    }

    #[test]
    fn test_missing_array() {
        let grid = grid_with_displacement();
        let warp = WarpVector::new("Velocity", 1.0);
        let err = warp.execute(&grid).unwrap_err();
        assert!(matches!(err, SceneError::MissingVectorArray(name) if name == "Velocity"));
    }

    #[test]
    fn test_scalar_array_rejected() {
        let mut grid = grid_with_displacement();
        grid.point_arrays.push(DataArray {
            name: "Pressure".to_string(),
            components: 1,
            values: vec![1.0, 2.0],
        });
        let warp = WarpVector::new("Pressure", 1.0);
        let err = warp.execute(&grid).unwrap_err();
        assert!(matches!(err, SceneError::NotAVectorArray { components: 1, .. }));
    }
}
