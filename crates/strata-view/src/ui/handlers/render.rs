//! Render parameter message handlers
//!
//! Handles: SetRepresentation, SetMeshColorField/Preset/Opacity,
//! SetWarpColorField/Preset/Opacity, SetWarpScale, SetAxesVisible,
//! ResetCamera.
//!
//! Every handler is idempotent, touches only its parameter's render
//! objects, and ends with exactly one repaint request.

use iced::Task;

use strata_core::color::LutPreset;
use strata_core::scene::{select_field, Representation};

use super::super::app::StrataApp;
use super::super::message::Message;

impl StrataApp {
    /// Handle SetRepresentation: applied to the mesh and its warped
    /// counterpart together
    pub fn handle_set_representation(&mut self, representation: Representation) -> Task<Message> {
        self.params.representation = representation;
        self.scene.set_representation(representation);
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetMeshColorField
    pub fn handle_set_mesh_color_field(&mut self, index: usize) -> Task<Message> {
        match select_field(&self.assets.catalog, index) {
            Ok(field) => {
                self.params.mesh_color_field = index;
                self.scene.mesh.mapper.color_by_field(field);
                self.invalidate_viewport();
            }
            Err(e) => log::error!("Mesh color-by selection failed: {}", e),
        }
        Task::none()
    }

    /// Handle SetWarpColorField
    pub fn handle_set_warp_color_field(&mut self, index: usize) -> Task<Message> {
        match select_field(&self.assets.catalog, index) {
            Ok(field) => {
                self.params.warp_color_field = index;
                self.scene.warp.mapper.color_by_field(field);
                self.invalidate_viewport();
            }
            Err(e) => log::error!("Warp color-by selection failed: {}", e),
        }
        Task::none()
    }

    /// Handle SetMeshColorPreset
    pub fn handle_set_mesh_color_preset(&mut self, preset: LutPreset) -> Task<Message> {
        self.params.mesh_preset = preset;
        self.scene.mesh.mapper.apply_hsv_ranges(preset.hsv_ranges());
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetWarpColorPreset
    pub fn handle_set_warp_color_preset(&mut self, preset: LutPreset) -> Task<Message> {
        self.params.warp_preset = preset;
        self.scene.warp.mapper.apply_hsv_ranges(preset.hsv_ranges());
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetMeshOpacity
    pub fn handle_set_mesh_opacity(&mut self, opacity: f64) -> Task<Message> {
        self.params.mesh_opacity = opacity;
        self.scene.mesh.property.opacity = opacity;
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetWarpOpacity
    pub fn handle_set_warp_opacity(&mut self, opacity: f64) -> Task<Message> {
        self.params.warp_opacity = opacity;
        self.scene.warp.property.opacity = opacity;
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetWarpScale: re-executes the warp filter on the new scale
    pub fn handle_set_warp_scale(&mut self, scale: f64) -> Task<Message> {
        self.params.warp_scale = scale;
        self.warp_filter.set_scale_factor(scale);
        match self.warp_filter.execute(&self.assets.grid) {
            Ok(points) => self.warped_points = points,
            // The loader validated the array at startup, so this only
            // fires if the configuration changed underneath us
            Err(e) => log::error!("Warp filter failed: {}", e),
        }
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle SetAxesVisible
    pub fn handle_set_axes_visible(&mut self, visible: bool) -> Task<Message> {
        self.scene.axes.visible = visible;
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle ResetCamera: re-frames onto everything currently visible
    pub fn handle_reset_camera(&mut self) -> Task<Message> {
        if let Some(bounds) = self.visible_bounds() {
            self.scene.camera.reset(bounds);
            self.invalidate_viewport();
        }
        Task::none()
    }
}
