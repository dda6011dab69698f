//! Global configuration for strata-view
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/strata/config.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use strata_core::scene::Camera;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Input data paths, read once at startup
    pub data: DataConfig,
    /// Initial camera pose
    pub camera: CameraConfig,
    /// Annotation database location
    pub database: DatabaseConfig,
    /// Display settings
    pub display: DisplayConfig,
}

/// Startup input paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Unstructured-grid results file (legacy ASCII VTK)
    pub grid_path: PathBuf,
    /// Surveyed site model (OBJ)
    pub model_path: PathBuf,
    /// Texture image for the site model
    pub texture_path: PathBuf,
    /// Point vector array driving the warp filter
    pub warp_array: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            grid_path: PathBuf::from("data/consolidation_step_8.vtk"),
            model_path: PathBuf::from("data/site_model.obj"),
            texture_path: PathBuf::from("data/site_texture.jpg"),
            warp_array: String::from("Displacement"),
        }
    }
}

/// Initial camera pose.
///
/// The defaults frame the reference survey site; `reset camera` re-frames
/// the loaded data at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub focal_point: [f64; 3],
    pub view_up: [f64; 3],
    pub clipping_range: [f64; 2],
    /// Vertical view angle in degrees
    pub view_angle: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [175.57928933895226, -48.246428725103065, 40.884611931851765],
            focal_point: [63.9077934374408, 35.45726816337757, 8.713665132410494],
            view_up: [-0.21329675699056322, 0.08935923577768858, 0.9728922964226493],
            clipping_range: [0.01, 1000.01],
            view_angle: 30.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            position: self.position.into(),
            focal_point: self.focal_point.into(),
            view_up: self.view_up.into(),
            clipping_range: (self.clipping_range[0], self.clipping_range[1]),
            view_angle: self.view_angle,
        }
    }
}

/// Annotation database section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/annotations.db"),
        }
    }
}

/// Display configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of the control drawer in logical pixels
    pub drawer_width: f32,
    /// Pick tolerance in pixels
    pub pick_tolerance: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            drawer_width: 325.0,
            pick_tolerance: 8.0,
        }
    }
}

impl Config {
    /// Clamp values to usable ranges
    pub fn validate(&mut self) {
        self.camera.view_angle = self.camera.view_angle.clamp(5.0, 120.0);
        if self.camera.clipping_range[0] <= 0.0 {
            self.camera.clipping_range[0] = 0.01;
        }
        if self.camera.clipping_range[1] <= self.camera.clipping_range[0] {
            self.camera.clipping_range[1] = self.camera.clipping_range[0] + 1000.0;
        }
        self.display.drawer_width = self.display.drawer_width.clamp(200.0, 600.0);
        self.display.pick_tolerance = self.display.pick_tolerance.clamp(1.0, 64.0);
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata")
        .join("config.yaml")
}

/// Load configuration, falling back to defaults when the file is missing
/// or malformed
pub fn load_config(path: &Path) -> Config {
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config {}: {} - using defaults", path.display(), e);
                Config::default()
            }
        },
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            Config::default()
        }
    };
    config.validate();
    config
}

/// Save configuration to the given path
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let contents = serde_yaml::to_string(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let mut config = Config::default();
        let before = format!("{:?}", config);
        config.validate();
        assert_eq!(before, format!("{:?}", config));
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = Config::default();
        config.camera.view_angle = 200.0;
        config.camera.clipping_range = [-1.0, -2.0];
        config.display.pick_tolerance = 0.0;
        config.validate();
        assert_eq!(config.camera.view_angle, 120.0);
        assert!(config.camera.clipping_range[0] > 0.0);
        assert!(config.camera.clipping_range[1] > config.camera.clipping_range[0]);
        assert_eq!(config.display.pick_tolerance, 1.0);
    }

    #[test]
    fn test_camera_config_round_trip() {
        let camera = CameraConfig::default().to_camera();
        assert_eq!(camera.view_angle, 30.0);
        assert_eq!(camera.clipping_range, (0.01, 1000.01));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.data.warp_array, config.data.warp_array);
        assert_eq!(parsed.camera.position, config.camera.position);
    }
}
