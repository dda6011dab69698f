//! Annotation and picking message handlers
//!
//! Handles: SetAnnotationMode, PickAt, RefreshAnnotations,
//! AnnotationsLoaded, EditAnnotation, CloseAnnotationEditor,
//! UpdateDraft*, SaveAnnotation, SaveAnnotationComplete.

use iced::{Point, Size, Task};

use strata_core::db::Annotation;

use super::super::app::StrataApp;
use super::super::message::Message;

impl StrataApp {
    /// Handle SetAnnotationMode
    pub fn handle_set_annotation_mode(&mut self, enabled: bool) -> Task<Message> {
        self.annotations.annotation_mode = enabled;
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle PickAt: single-shot point pick against the visible scene.
    ///
    /// A click with nothing in tolerance clears the previous pick rather
    /// than reporting a stale position.
    pub fn handle_pick_at(&mut self, position: Point, viewport: Size) -> Task<Message> {
        let mut candidates = Vec::new();
        if self.scene.mesh.visible {
            candidates.extend_from_slice(&self.assets.grid.points);
        }
        if self.scene.warp.visible {
            candidates.extend_from_slice(&self.warped_points);
        }
        if self.scene.model.visible {
            candidates.extend_from_slice(&self.assets.model.positions);
        }

        let hit = self.picker.pick(
            (position.x, position.y),
            (viewport.width, viewport.height),
            &self.scene.camera,
            &candidates,
        );

        match hit {
            Some(pick) => {
                log::info!(
                    "Picked ({:.3}, {:.3}, {:.3}) at {:.1}px",
                    pick.position.x,
                    pick.position.y,
                    pick.position.z,
                    pick.screen_distance
                );
                self.annotations.status.clear();
            }
            None => {
                log::debug!("Pick at ({:.0}, {:.0}): nothing in tolerance", position.x, position.y);
                self.annotations.status = String::from("Nothing under the cursor");
            }
        }
        self.annotations.last_pick = hit;
        self.invalidate_viewport();
        Task::none()
    }

    /// Handle RefreshAnnotations: reload the snapshot and count from the
    /// store in a background task
    pub fn handle_refresh_annotations(&mut self) -> Task<Message> {
        self.annotations.loading = true;
        let service = self.assets.annotations.clone();

        Task::perform(
            async move {
                let records = service.find_all().map_err(|e| e.to_string())?;
                let count = service.count().map_err(|e| e.to_string())?;
                Ok::<_, String>((records, count))
            },
            Message::AnnotationsLoaded,
        )
    }

    /// Handle AnnotationsLoaded
    pub fn handle_annotations_loaded(
        &mut self,
        result: Result<(Vec<Annotation>, usize), String>,
    ) -> Task<Message> {
        self.annotations.loading = false;
        match result {
            Ok((records, count)) => {
                self.annotations.records = records;
                self.annotations.count = count;
                self.invalidate_viewport();
            }
            Err(e) => {
                log::error!("Failed to load annotations: {}", e);
                self.annotations.status = format!("Failed to load: {}", e);
            }
        }
        Task::none()
    }

    /// Handle EditAnnotation
    pub fn handle_edit_annotation(&mut self, index: usize) -> Task<Message> {
        self.annotations.open_editor(index);
        Task::none()
    }

    /// Handle CloseAnnotationEditor
    pub fn handle_close_annotation_editor(&mut self) -> Task<Message> {
        self.annotations.close_editor();
        Task::none()
    }

    /// Handle SaveAnnotation: parse the drafts, keep the edit in the
    /// snapshot, and persist by identity (last write wins)
    pub fn handle_save_annotation(&mut self) -> Task<Message> {
        let record = match self.annotations.draft_record() {
            Ok(record) => record,
            Err(e) => {
                self.annotations.status = e;
                return Task::none();
            }
        };

        // The snapshot keeps the edit regardless of how the write goes;
        // the store result only drives the status line
        if let Some(index) = self.annotations.editing {
            if let Some(slot) = self.annotations.records.get_mut(index) {
                *slot = record.clone();
            }
        }
        self.invalidate_viewport();

        let service = self.assets.annotations.clone();
        Task::perform(
            async move { service.update(&record).map_err(|e| e.to_string()) },
            Message::SaveAnnotationComplete,
        )
    }

    /// Handle SaveAnnotationComplete
    pub fn handle_save_annotation_complete(
        &mut self,
        result: Result<(), String>,
    ) -> Task<Message> {
        match result {
            Ok(()) => {
                log::info!("Annotation saved");
                self.annotations.status = String::from("Saved");
                self.annotations.close_editor();
            }
            Err(e) => {
                log::error!("Failed to save annotation: {}", e);
                self.annotations.status = format!("Failed to save: {}", e);
            }
        }
        Task::none()
    }
}
