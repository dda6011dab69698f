//! Pipeline panel message handlers
//!
//! Handles: SelectCard, SetNodeVisible.

use iced::Task;

use super::super::app::StrataApp;
use super::super::message::Message;
use super::super::state::{ActiveCard, PipelineNode};

impl StrataApp {
    /// Handle SelectCard
    pub fn handle_select_card(&mut self, card: ActiveCard) -> Task<Message> {
        self.active_card = card;
        Task::none()
    }

    /// Handle SetNodeVisible
    pub fn handle_set_node_visible(&mut self, node: PipelineNode, visible: bool) -> Task<Message> {
        match node {
            PipelineNode::Mesh => self.scene.mesh.visible = visible,
            PipelineNode::Warp => self.scene.warp.visible = visible,
            PipelineNode::Model => self.scene.model.visible = visible,
        }
        self.invalidate_viewport();
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::app::StrataApp;
    use super::super::super::message::Message;
    use super::super::super::state::{ActiveCard, PipelineNode};

    #[test]
    fn test_select_card() {
        let mut app = StrataApp::fixture();
        assert_eq!(app.active_card, ActiveCard::Mesh);
        app.update(Message::SelectCard(ActiveCard::Annotations));
        assert_eq!(app.active_card, ActiveCard::Annotations);
    }

    #[test]
    fn test_node_visibility_toggles_one_actor() {
        let mut app = StrataApp::fixture();
        app.update(Message::SetNodeVisible(PipelineNode::Warp, false));
        assert!(!app.scene.warp.visible);
        assert!(app.scene.mesh.visible);
        assert!(app.scene.model.visible);
    }

    #[test]
    fn test_card_selection_does_not_repaint() {
        // Card selection is drawer-only state; the viewport is untouched
        let mut app = StrataApp::fixture();
        let before = app.scene.repaint_generation();
        app.update(Message::SelectCard(ActiveCard::Warp));
        assert_eq!(app.scene.repaint_generation(), before);
    }
}
