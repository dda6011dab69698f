//! Main application state and iced implementation

use glam::DVec3;
use iced::widget::{
    button, canvas, center, checkbox, column, container, mouse_area, opaque, row, rule,
    scrollable, stack, text, Canvas, Space,
};
use iced::{Color, Element, Length, Task, Theme};

use strata_core::scene::{PointPicker, Scene, WarpVector};
use strata_core::types::Bounds;

use crate::config::Config;
use crate::loader::LoadedAssets;

use super::message::Message;
use super::side_panel;
use super::state::{ActiveCard, AnnotationPanelState, RenderParams};
use super::viewport::ViewportProgram;

/// Main application
pub struct StrataApp {
    /// Global configuration
    pub config: Config,
    /// Startup-loaded inputs (grid, model, texture, annotation store)
    pub assets: LoadedAssets,
    /// Render-object parameter model
    pub scene: Scene,
    /// Warp filter, re-executed when the scale changes
    pub warp_filter: WarpVector,
    /// Output of the last warp execution
    pub warped_points: Vec<DVec3>,
    /// Current control values
    pub params: RenderParams,
    /// Card shown in the drawer
    pub active_card: ActiveCard,
    /// Annotation panel state
    pub annotations: AnnotationPanelState,
    /// Point picker with the configured tolerance
    pub picker: PointPicker,
    /// Decoded-on-demand texture preview for the model card
    pub texture_preview: iced::widget::image::Handle,
    /// Cached viewport geometry, cleared on repaint
    pub viewport_cache: canvas::Cache,
    /// Repaint generation the cache was last cleared for
    pub painted_generation: u64,
}

impl StrataApp {
    /// Create the application from pre-loaded assets.
    ///
    /// The load itself happened in `main` before the UI started; setup
    /// here wires the pipeline and marks the scene ready, so repaint
    /// requests start taking effect.
    pub fn new(config: Config, assets: LoadedAssets) -> (Self, Task<Message>) {
        let params = RenderParams::default();

        let mut scene = Scene::new();
        scene.camera = config.camera.to_camera();
        scene.set_representation(params.representation);

        if let Some(field) = assets.catalog.first() {
            scene.mesh.mapper.color_by_field(field);
            scene.warp.mapper.color_by_field(field);
        }
        scene.mesh.mapper.apply_hsv_ranges(params.mesh_preset.hsv_ranges());
        scene.warp.mapper.apply_hsv_ranges(params.warp_preset.hsv_ranges());

        let warp_filter = WarpVector::new(config.data.warp_array.clone(), params.warp_scale);
        let warped_points = match warp_filter.execute(&assets.grid) {
            Ok(points) => points,
            Err(e) => {
                // The loader validated the array; this is unreachable in
                // practice but must not take the UI down
                log::error!("Initial warp failed: {}", e);
                assets.grid.points.clone()
            }
        };

        let grid_bounds = assets.grid.bounds();
        let model_bounds = assets.model.bounds();
        scene.axes.bounds = match (grid_bounds, model_bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };

        let picker = PointPicker::new(config.display.pick_tolerance);
        let texture_preview =
            iced::widget::image::Handle::from_bytes(assets.texture.bytes.clone());

        scene.mark_ready();
        log::info!("Pipeline ready");

        let app = Self {
            config,
            assets,
            scene,
            warp_filter,
            warped_points,
            params,
            active_card: ActiveCard::Mesh,
            annotations: AnnotationPanelState::default(),
            picker,
            texture_preview,
            viewport_cache: canvas::Cache::new(),
            painted_generation: 0,
        };

        // Initial annotation snapshot
        let cmd = Task::perform(async {}, |_| Message::RefreshAnnotations);

        (app, cmd)
    }

    /// Update state based on message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Pipeline panel
            Message::SelectCard(card) => self.handle_select_card(card),
            Message::SetNodeVisible(node, visible) => self.handle_set_node_visible(node, visible),

            // Render parameters
            Message::SetRepresentation(representation) => {
                self.handle_set_representation(representation)
            }
            Message::SetMeshColorField(index) => self.handle_set_mesh_color_field(index),
            Message::SetMeshColorPreset(preset) => self.handle_set_mesh_color_preset(preset),
            Message::SetMeshOpacity(opacity) => self.handle_set_mesh_opacity(opacity),
            Message::SetWarpColorField(index) => self.handle_set_warp_color_field(index),
            Message::SetWarpColorPreset(preset) => self.handle_set_warp_color_preset(preset),
            Message::SetWarpOpacity(opacity) => self.handle_set_warp_opacity(opacity),
            Message::SetWarpScale(scale) => self.handle_set_warp_scale(scale),
            Message::SetAxesVisible(visible) => self.handle_set_axes_visible(visible),
            Message::ResetCamera => self.handle_reset_camera(),

            // Picking
            Message::SetAnnotationMode(enabled) => self.handle_set_annotation_mode(enabled),
            Message::PickAt { position, viewport } => self.handle_pick_at(position, viewport),

            // Annotations
            Message::RefreshAnnotations => self.handle_refresh_annotations(),
            Message::AnnotationsLoaded(result) => self.handle_annotations_loaded(result),
            Message::EditAnnotation(index) => self.handle_edit_annotation(index),
            Message::CloseAnnotationEditor => self.handle_close_annotation_editor(),
            Message::UpdateDraftX(value) => {
                self.annotations.draft_x = value;
                Task::none()
            }
            Message::UpdateDraftY(value) => {
                self.annotations.draft_y = value;
                Task::none()
            }
            Message::UpdateDraftZ(value) => {
                self.annotations.draft_z = value;
                Task::none()
            }
            Message::UpdateDraftLevel(value) => {
                self.annotations.draft_level = value;
                Task::none()
            }
            Message::SaveAnnotation => self.handle_save_annotation(),
            Message::SaveAnnotationComplete(result) => self.handle_save_annotation_complete(result),
        }
    }

    /// Signal a view refresh and, if it took effect, invalidate the
    /// cached viewport geometry so exactly one redraw follows.
    pub fn invalidate_viewport(&mut self) {
        self.scene.request_repaint();
        if self.scene.repaint_generation() != self.painted_generation {
            self.viewport_cache.clear();
            self.painted_generation = self.scene.repaint_generation();
        }
    }

    /// Combined bounds of the currently visible actors
    pub fn visible_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut extend = |other: Option<Bounds>| {
            bounds = match (bounds, other) {
                (Some(a), Some(b)) => Some(a.union(b)),
                (a, b) => a.or(b),
            };
        };
        if self.scene.mesh.visible {
            extend(self.assets.grid.bounds());
        }
        if self.scene.warp.visible {
            extend(Bounds::from_points(self.warped_points.iter().copied()));
        }
        if self.scene.model.visible {
            extend(self.assets.model.bounds());
        }
        bounds
    }

    /// Render the UI
    pub fn view(&self) -> Element<'_, Message> {
        let toolbar = self.view_toolbar();

        let drawer = container(scrollable(self.view_drawer()))
            .width(Length::Fixed(self.config.display.drawer_width))
            .height(Length::Fill)
            .padding(8);

        let viewport = Canvas::new(ViewportProgram {
            scene: &self.scene,
            grid: &self.assets.grid,
            warped_points: &self.warped_points,
            model: &self.assets.model,
            annotations: &self.annotations.records,
            last_pick: self.annotations.last_pick,
            annotation_mode: self.annotations.annotation_mode,
            cache: &self.viewport_cache,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let body = row![drawer, viewport];

        let base: Element<'_, Message> = container(column![toolbar, body].spacing(4))
            .width(Length::Fill)
            .height(Length::Fill)
            .into();

        // Overlay the annotation edit dialog when open
        if self.annotations.editing.is_some() {
            let backdrop = mouse_area(
                container(Space::new())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .style(|_theme| container::Style {
                        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.4).into()),
                        ..Default::default()
                    }),
            )
            .on_press(Message::CloseAnnotationEditor);

            let modal = center(opaque(side_panel::annotation_editor(&self.annotations)))
                .width(Length::Fill)
                .height(Length::Fill);

            stack![base, backdrop, modal].into()
        } else {
            base
        }
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Light
    }

    fn view_toolbar(&self) -> Element<'_, Message> {
        let axes_toggle = checkbox(self.scene.axes.visible)
            .label("Axes")
            .on_toggle(Message::SetAxesVisible)
            .size(16);

        let annotate_toggle = checkbox(self.annotations.annotation_mode)
            .label("Annotate")
            .on_toggle(Message::SetAnnotationMode)
            .size(16);

        let reset_camera = button(text("Reset view").size(13))
            .on_press(Message::ResetCamera)
            .style(button::secondary);

        row![
            text("strata-view").size(20),
            Space::new().width(Length::Fill),
            axes_toggle,
            annotate_toggle,
            reset_camera,
        ]
        .spacing(12)
        .padding(8)
        .align_y(iced::Alignment::Center)
        .into()
    }

    fn view_drawer(&self) -> Element<'_, Message> {
        let card: Element<'_, Message> = match self.active_card {
            ActiveCard::Mesh => side_panel::mesh_card(&self.params, &self.assets.catalog),
            ActiveCard::Warp => side_panel::warp_card(&self.params, &self.assets.catalog),
            ActiveCard::Model => side_panel::model_card(
                &self.assets.model,
                &self.assets.texture,
                &self.texture_preview,
            ),
            ActiveCard::Annotations => side_panel::annotation_card(&self.annotations),
        };

        column![
            side_panel::pipeline_widget(&self.scene, self.active_card),
            rule::horizontal(1),
            card,
        ]
        .spacing(8)
        .into()
    }
}

#[cfg(test)]
impl StrataApp {
    /// App over a small in-memory dataset: Pressure (point, 0..100),
    /// Stress (cell, -50..50), a Displacement vector array, a one-quad
    /// model, and an empty in-memory annotation store. The camera is
    /// framed onto the data.
    pub fn fixture() -> StrataApp {
        use std::sync::Arc;

        use strata_core::dataset::{parse_legacy_vtk, parse_obj, Texture};
        use strata_core::db::AnnotationService;

        let grid = parse_legacy_vtk(
            "\
# vtk DataFile Version 3.0
fixture
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 double
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
CELLS 1 5
4 0 1 2 3
CELL_TYPES 1
10
POINT_DATA 4
SCALARS Pressure double
LOOKUP_TABLE default
0.0 25.0 75.0 100.0
VECTORS Displacement double
0.0 0.0 0.1
0.0 0.0 0.2
0.0 0.0 0.3
0.0 0.0 0.4
CELL_DATA 1
SCALARS Stress double
LOOKUP_TABLE default
-50.0
",
        )
        .expect("fixture grid parses");
        let catalog = grid.field_catalog();

        let model = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n")
            .expect("fixture model parses");

        let assets = LoadedAssets {
            grid: Arc::new(grid),
            catalog: Arc::new(catalog),
            model: Arc::new(model),
            texture: Arc::new(Texture {
                path: "fixture.jpg".into(),
                bytes: Vec::new(),
            }),
            annotations: AnnotationService::in_memory().expect("in-memory store"),
        };

        let (mut app, _) = StrataApp::new(Config::default(), assets);
        let bounds = app.visible_bounds().expect("fixture has geometry");
        app.scene.camera.reset(bounds);
        app
    }
}
