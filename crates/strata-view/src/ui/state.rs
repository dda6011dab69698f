//! UI-side state: card selection, render parameter values, and the
//! annotation panel with its editable snapshot

use strata_core::color::LutPreset;
use strata_core::db::Annotation;
use strata_core::scene::{PickedPoint, Representation};

/// Which control card is shown in the drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveCard {
    #[default]
    Mesh,
    Warp,
    Model,
    Annotations,
}

/// Selectable scene nodes in the pipeline tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineNode {
    Mesh,
    Warp,
    Model,
}

impl PipelineNode {
    pub const ALL: [PipelineNode; 3] = [
        PipelineNode::Mesh,
        PipelineNode::Warp,
        PipelineNode::Model,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PipelineNode::Mesh => "Mesh",
            PipelineNode::Warp => "Warp",
            PipelineNode::Model => "Model",
        }
    }

    pub fn card(self) -> ActiveCard {
        match self {
            PipelineNode::Mesh => ActiveCard::Mesh,
            PipelineNode::Warp => ActiveCard::Warp,
            PipelineNode::Model => ActiveCard::Model,
        }
    }
}

/// Current values of the render parameter controls.
///
/// These are the UI-side bindings; handlers copy changes into the scene
/// object model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub representation: Representation,
    pub mesh_color_field: usize,
    pub mesh_preset: LutPreset,
    pub mesh_opacity: f64,
    pub warp_color_field: usize,
    pub warp_preset: LutPreset,
    pub warp_opacity: f64,
    pub warp_scale: f64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            representation: Representation::SurfaceWithEdges,
            mesh_color_field: 0,
            mesh_preset: LutPreset::Rainbow,
            mesh_opacity: 1.0,
            warp_color_field: 0,
            warp_preset: LutPreset::Rainbow,
            warp_opacity: 1.0,
            warp_scale: 1.0,
        }
    }
}

/// State of the annotation panel
#[derive(Debug, Default)]
pub struct AnnotationPanelState {
    /// Editable snapshot of the stored records
    pub records: Vec<Annotation>,
    /// Total record count reported by the store
    pub count: usize,
    /// Snapshot refresh in flight
    pub loading: bool,
    /// Index into `records` currently open in the edit dialog
    pub editing: Option<usize>,
    pub draft_name: String,
    pub draft_x: String,
    pub draft_y: String,
    pub draft_z: String,
    pub draft_level: String,
    /// Save/pick feedback line
    pub status: String,
    /// Whether viewport clicks pick instead of orbiting
    pub annotation_mode: bool,
    /// Result of the most recent pick, if it hit anything
    pub last_pick: Option<PickedPoint>,
}

impl AnnotationPanelState {
    /// Fill the drafts from a record and open the dialog
    pub fn open_editor(&mut self, index: usize) {
        let Some(record) = self.records.get(index) else {
            return;
        };
        self.draft_name = record.name.clone();
        self.draft_x = record.x.to_string();
        self.draft_y = record.y.to_string();
        self.draft_z = record.z.to_string();
        self.draft_level = record.level.to_string();
        self.editing = Some(index);
        self.status.clear();
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    /// Parse the drafts back into a record.
    ///
    /// The identity (name) is kept from the record being edited; renaming
    /// would be a create, and records are created externally.
    pub fn draft_record(&self) -> Result<Annotation, String> {
        let index = self.editing.ok_or_else(|| String::from("No record selected"))?;
        let original = self
            .records
            .get(index)
            .ok_or_else(|| String::from("Record no longer in snapshot"))?;

        let x = parse_coord(&self.draft_x, "x")?;
        let y = parse_coord(&self.draft_y, "y")?;
        let z = parse_coord(&self.draft_z, "z")?;
        let level = self
            .draft_level
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid level '{}'", self.draft_level))?;

        Ok(Annotation {
            name: original.name.clone(),
            x,
            y,
            z,
            level,
        })
    }
}

fn parse_coord(draft: &str, axis: &str) -> Result<f64, String> {
    draft
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid {} coordinate '{}'", axis, draft))
}
