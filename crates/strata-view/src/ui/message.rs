//! Application messages
//!
//! Every named render parameter and annotation operation is a variant
//! here; `update` matches exhaustively, so an unhandled parameter is a
//! compile error rather than a silently dangling state listener.

use iced::{Point, Size};

use strata_core::color::LutPreset;
use strata_core::db::Annotation;
use strata_core::scene::Representation;

use super::state::{ActiveCard, PipelineNode};

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Pipeline panel
    SelectCard(ActiveCard),
    SetNodeVisible(PipelineNode, bool),

    // Render parameters
    SetRepresentation(Representation),
    SetMeshColorField(usize),
    SetMeshColorPreset(LutPreset),
    SetMeshOpacity(f64),
    SetWarpColorField(usize),
    SetWarpColorPreset(LutPreset),
    SetWarpOpacity(f64),
    SetWarpScale(f64),
    SetAxesVisible(bool),
    ResetCamera,

    // Picking
    SetAnnotationMode(bool),
    /// Short click in annotation mode at a viewport position
    PickAt { position: Point, viewport: Size },

    // Annotations
    RefreshAnnotations,
    /// Snapshot and store count fetched in the background
    AnnotationsLoaded(Result<(Vec<Annotation>, usize), String>),
    EditAnnotation(usize),
    CloseAnnotationEditor,
    UpdateDraftX(String),
    UpdateDraftY(String),
    UpdateDraftZ(String),
    UpdateDraftLevel(String),
    SaveAnnotation,
    SaveAnnotationComplete(Result<(), String>),
}
