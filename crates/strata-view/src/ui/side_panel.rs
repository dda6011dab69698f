//! Drawer cards: pipeline tree, per-actor parameter cards, and the
//! annotation panel with its edit dialog

use iced::widget::{
    button, checkbox, column, container, pick_list, row, scrollable, slider, text, text_input,
    Space,
};
use iced::{Alignment, Color, Element, Length};

use strata_core::color::LutPreset;
use strata_core::dataset::{FieldDescriptor, SurfaceModel, Texture};
use strata_core::scene::{Representation, Scene};

use super::message::Message;
use super::state::{ActiveCard, AnnotationPanelState, PipelineNode, RenderParams};

/// Scene tree with per-node visibility, in the spirit of a pipeline
/// browser: clicking a name selects its card, the checkbox toggles the
/// actor.
pub fn pipeline_widget<'a>(scene: &Scene, active_card: ActiveCard) -> Element<'a, Message> {
    let mut rows = column![].spacing(2);

    for node in PipelineNode::ALL {
        let visible = match node {
            PipelineNode::Mesh => scene.mesh.visible,
            PipelineNode::Warp => scene.warp.visible,
            PipelineNode::Model => scene.model.visible,
        };
        let is_active = active_card == node.card();

        let select = button(text(node.label()).size(14))
            .on_press(Message::SelectCard(node.card()))
            .style(if is_active {
                button::primary
            } else {
                button::text
            })
            .padding([2, 8]);

        let toggle = checkbox(visible)
            .on_toggle(move |value| Message::SetNodeVisible(node, value))
            .size(16);

        // Warp is a child of the mesh node
        let indent = if node == PipelineNode::Warp { 16.0 } else { 0.0 };

        rows = rows.push(
            row![Space::new().width(indent), toggle, select]
                .spacing(6)
                .align_y(Alignment::Center),
        );
    }

    let annotations_btn = button(text("Annotations").size(14))
        .on_press(Message::SelectCard(ActiveCard::Annotations))
        .style(if active_card == ActiveCard::Annotations {
            button::primary
        } else {
            button::text
        })
        .padding([2, 8]);

    rows = rows.push(row![Space::new().width(22.0), annotations_btn]);

    container(rows).width(Length::Fill).padding(4).into()
}

/// Card chrome shared by all drawer cards
fn ui_card<'a>(title: &'a str, content: Element<'a, Message>) -> Element<'a, Message> {
    let header = container(text(title).size(14))
        .width(Length::Fill)
        .padding([4, 8])
        .style(|_theme| container::Style {
            background: Some(Color::from_rgb(0.85, 0.85, 0.88).into()),
            ..Default::default()
        });

    container(column![header, container(content).padding(8)])
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn field_picker<'a>(
    label: &'a str,
    catalog: &[FieldDescriptor],
    selected_index: usize,
    on_select: fn(usize) -> Message,
) -> Element<'a, Message> {
    let options: Vec<String> = catalog
        .iter()
        .map(|f| format!("{} ({})", f.name, f.association.label()))
        .collect();
    let selected = options.get(selected_index).cloned();

    let options_for_closure = options.clone();
    let picker = pick_list(options, selected, move |choice| {
        let index = options_for_closure
            .iter()
            .position(|o| o == &choice)
            .unwrap_or(0);
        on_select(index)
    })
    .text_size(13)
    .width(Length::Fill);

    column![text(label).size(12), picker].spacing(2).into()
}

fn preset_picker<'a>(
    label: &'a str,
    selected: LutPreset,
    on_select: fn(LutPreset) -> Message,
) -> Element<'a, Message> {
    let picker = pick_list(LutPreset::ALL, Some(selected), on_select)
        .text_size(13)
        .width(Length::Fill);
    column![text(label).size(12), picker].spacing(2).into()
}

fn opacity_slider<'a>(value: f64, on_change: fn(f64) -> Message) -> Element<'a, Message> {
    column![
        text("Opacity").size(12),
        slider(0.0..=1.0, value, on_change).step(0.1),
    ]
    .spacing(2)
    .into()
}

/// Mesh card: representation, color-by, colormap, opacity
pub fn mesh_card<'a>(params: &RenderParams, catalog: &[FieldDescriptor]) -> Element<'a, Message> {
    let representation = column![
        text("Representation").size(12),
        pick_list(
            Representation::ALL,
            Some(params.representation),
            Message::SetRepresentation,
        )
        .text_size(13)
        .width(Length::Fill),
    ]
    .spacing(2);

    let color_row = row![
        field_picker("Color by", catalog, params.mesh_color_field, Message::SetMeshColorField),
        preset_picker("Colormap", params.mesh_preset, Message::SetMeshColorPreset),
    ]
    .spacing(8);

    ui_card(
        "Mesh",
        column![
            representation,
            color_row,
            opacity_slider(params.mesh_opacity, Message::SetMeshOpacity),
        ]
        .spacing(8)
        .into(),
    )
}

/// Warp card: deformation scale, color-by, colormap, opacity
pub fn warp_card<'a>(params: &RenderParams, catalog: &[FieldDescriptor]) -> Element<'a, Message> {
    let scale = column![
        row![
            text("Warp scale").size(12),
            Space::new().width(Length::Fill),
            text(format!("{:.0}", params.warp_scale)).size(12),
        ],
        slider(1.0..=1000.0, params.warp_scale, Message::SetWarpScale).step(1.0),
    ]
    .spacing(2);

    let color_row = row![
        field_picker("Color by", catalog, params.warp_color_field, Message::SetWarpColorField),
        preset_picker("Colormap", params.warp_preset, Message::SetWarpColorPreset),
    ]
    .spacing(8);

    ui_card(
        "Warp",
        column![
            scale,
            color_row,
            opacity_slider(params.warp_opacity, Message::SetWarpOpacity),
        ]
        .spacing(8)
        .into(),
    )
}

/// Model card: texture preview and geometry stats
pub fn model_card<'a>(
    model: &SurfaceModel,
    texture: &Texture,
    preview: &'a iced::widget::image::Handle,
) -> Element<'a, Message> {
    let stats = text(format!(
        "{} vertices, {} triangles",
        model.positions.len(),
        model.triangles.len()
    ))
    .size(12);

    let texture_label = text(format!(
        "Texture: {}",
        texture
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    ))
    .size(12);

    ui_card(
        "Model",
        column![
            stats,
            texture_label,
            iced::widget::image(preview.clone()).width(Length::Fill),
        ]
        .spacing(8)
        .into(),
    )
}

/// Annotation card: record list, count, and pick feedback
pub fn annotation_card<'a>(state: &'a AnnotationPanelState) -> Element<'a, Message> {
    let header = row![
        text(format!("{} markers", state.count)).size(12),
        Space::new().width(Length::Fill),
        button(text("Refresh").size(12))
            .on_press(Message::RefreshAnnotations)
            .style(button::secondary)
            .padding([2, 8]),
    ]
    .align_y(Alignment::Center);

    let mut list = column![].spacing(4);
    if state.loading {
        list = list.push(text("Loading...").size(12));
    } else if state.records.is_empty() {
        list = list.push(text("No annotations recorded").size(12));
    } else {
        for (index, record) in state.records.iter().enumerate() {
            list = list.push(
                row![
                    text(&record.name).size(13).width(Length::Fill),
                    text(format!("L{}", record.level)).size(12),
                    button(text("Edit").size(12))
                        .on_press(Message::EditAnnotation(index))
                        .style(button::secondary)
                        .padding([2, 8]),
                ]
                .spacing(6)
                .align_y(Alignment::Center),
            );
        }
    }

    let mode_hint = if state.annotation_mode {
        text("Short-click the viewport to probe a position").size(11)
    } else {
        text("Enable Annotate in the toolbar to probe positions").size(11)
    };

    let pick_line: Element<'a, Message> = match state.last_pick {
        Some(pick) => text(format!(
            "Picked ({:.2}, {:.2}, {:.2})",
            pick.position.x, pick.position.y, pick.position.z
        ))
        .size(12)
        .into(),
        None => text("No pick yet").size(12).into(),
    };

    let mut content = column![
        header,
        scrollable(list).height(Length::Fixed(180.0)),
        mode_hint,
        pick_line,
    ]
    .spacing(8);

    if !state.status.is_empty() {
        content = content.push(text(&state.status).size(12));
    }

    ui_card("Annotations", content.into())
}

/// Single-record edit dialog, shown as a modal overlay
pub fn annotation_editor<'a>(state: &'a AnnotationPanelState) -> Element<'a, Message> {
    let title = row![
        text("Edit annotation").size(18),
        Space::new().width(Length::Fill),
        button(text("x").size(16))
            .on_press(Message::CloseAnnotationEditor)
            .style(button::text),
    ]
    .align_y(Alignment::Center);

    // The name is the record identity and stays fixed; renaming would be
    // a create, and records are created by the survey tooling
    let name_row = row![
        text("Name:").size(14).width(60),
        text(&state.draft_name).size(14),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let coord_input = |label: &'static str, value: &'a str, on_input: fn(String) -> Message| {
        row![
            text(label).size(14).width(60),
            text_input("0.0", value)
                .on_input(on_input)
                .width(Length::Fixed(120.0)),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
    };

    let buttons = row![
        Space::new().width(Length::Fill),
        button(text("Cancel"))
            .on_press(Message::CloseAnnotationEditor)
            .style(button::secondary),
        button(text("Save")).on_press(Message::SaveAnnotation),
    ]
    .spacing(8);

    let mut content = column![
        title,
        name_row,
        coord_input("X:", &state.draft_x, Message::UpdateDraftX),
        coord_input("Y:", &state.draft_y, Message::UpdateDraftY),
        coord_input("Z:", &state.draft_z, Message::UpdateDraftZ),
        coord_input("Level:", &state.draft_level, Message::UpdateDraftLevel),
        buttons,
    ]
    .spacing(10);

    if !state.status.is_empty() {
        content = content.push(text(&state.status).size(12));
    }

    container(content)
        .width(Length::Fixed(320.0))
        .padding(16)
        .style(container::rounded_box)
        .into()
}
