//! Synchronous startup loading
//!
//! All inputs are read before the UI starts: the grid, the surveyed model,
//! its texture, and the annotation database. Any failure aborts startup;
//! there is no partial or degraded mode.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use strata_core::dataset::{
    read_legacy_vtk, read_obj, read_texture, FieldDescriptor, SurfaceModel, Texture,
    UnstructuredGrid,
};
use strata_core::db::AnnotationService;

use crate::config::Config;

/// Everything the dashboard needs, loaded once.
///
/// Cheap to clone: all payloads are behind `Arc`.
#[derive(Clone)]
pub struct LoadedAssets {
    pub grid: Arc<UnstructuredGrid>,
    pub catalog: Arc<Vec<FieldDescriptor>>,
    pub model: Arc<SurfaceModel>,
    pub texture: Arc<Texture>,
    pub annotations: Arc<AnnotationService>,
}

pub fn load(config: &Config) -> Result<LoadedAssets> {
    let grid = read_legacy_vtk(&config.data.grid_path)
        .with_context(|| format!("Failed to load grid {}", config.data.grid_path.display()))?;
    let catalog = grid.field_catalog();
    log::info!(
        "Loaded grid: {} points, {} cells, {} fields",
        grid.points.len(),
        grid.cells.len(),
        catalog.len()
    );
    for field in &catalog {
        log::info!(
            "  field {}: {} ({}, range {:.3}..{:.3})",
            field.index,
            field.name,
            field.association.label(),
            field.range.0,
            field.range.1
        );
    }

    // The warp pipeline is not optional; a grid without the configured
    // displacement array cannot be visualized
    let warp_array = grid
        .point_array(&config.data.warp_array)
        .with_context(|| format!("Grid has no point array '{}'", config.data.warp_array))?;
    if warp_array.components < 3 {
        bail!(
            "Point array '{}' has {} components, expected a vector array",
            config.data.warp_array,
            warp_array.components
        );
    }

    let model = read_obj(&config.data.model_path)
        .with_context(|| format!("Failed to load model {}", config.data.model_path.display()))?;
    log::info!(
        "Loaded site model: {} vertices, {} triangles",
        model.positions.len(),
        model.triangles.len()
    );

    let texture = read_texture(&config.data.texture_path).with_context(|| {
        format!("Failed to load texture {}", config.data.texture_path.display())
    })?;
    log::info!("Loaded texture: {} bytes", texture.bytes.len());

    let annotations = AnnotationService::open(&config.database.path).with_context(|| {
        format!(
            "Failed to open annotation database {}",
            config.database.path.display()
        )
    })?;

    Ok(LoadedAssets {
        grid: Arc::new(grid),
        catalog: Arc::new(catalog),
        model: Arc::new(model),
        texture: Arc::new(texture),
        annotations,
    })
}
