//! Projected scene viewport
//!
//! Canvas program that projects the scene through the camera and draws
//! each visible actor with its current style and lookup-table colors.
//! Drawn geometry is cached; handlers clear the cache whenever the
//! scene's repaint generation advances, so one state change produces one
//! redraw.

use std::time::{Duration, Instant};

use glam::DVec3;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Geometry, Frame, Path, Program, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};

use strata_core::dataset::{FieldAssociation, SurfaceModel, UnstructuredGrid};
use strata_core::db::Annotation;
use strata_core::scene::{Actor, Camera, PickedPoint, Scene, Style};

use super::message::Message;
use super::theme;

/// Press-to-release threshold below which a click counts as a pick
pub const SHORT_CLICK: Duration = Duration::from_millis(100);

pub fn is_short_click(elapsed: Duration) -> bool {
    elapsed < SHORT_CLICK
}

/// Borrowed view of everything the viewport draws
pub struct ViewportProgram<'a> {
    pub scene: &'a Scene,
    pub grid: &'a UnstructuredGrid,
    pub warped_points: &'a [DVec3],
    pub model: &'a SurfaceModel,
    pub annotations: &'a [Annotation],
    pub last_pick: Option<PickedPoint>,
    pub annotation_mode: bool,
    pub cache: &'a canvas::Cache,
}

/// Canvas state tracking the press that may become a pick click
#[derive(Debug, Clone, Copy, Default)]
pub struct Interaction {
    pressed: Option<Instant>,
}

impl<'a> Program<Message> for ViewportProgram<'a> {
    type State = Interaction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if cursor.position_in(bounds).is_some() {
                    interaction.pressed = Some(Instant::now());
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if let Some(pressed_at) = interaction.pressed.take() {
                    if self.annotation_mode && is_short_click(pressed_at.elapsed()) {
                        if let Some(position) = cursor.position_in(bounds) {
                            return Some(canvas::Action::publish(Message::PickAt {
                                position,
                                viewport: bounds.size(),
                            }));
                        }
                    }
                }
            }
            _ => {}
        }

        None
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.annotation_mode && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), theme::BACKGROUND);

            let viewport = (bounds.width, bounds.height);
            let camera = &self.scene.camera;

            if self.scene.model.visible {
                draw_model(frame, viewport, camera, &self.scene.model, self.model);
            }
            if self.scene.mesh.visible {
                draw_grid_actor(frame, viewport, camera, &self.scene.mesh, self.grid, &self.grid.points);
            }
            if self.scene.warp.visible {
                draw_grid_actor(frame, viewport, camera, &self.scene.warp, self.grid, self.warped_points);
            }
            if self.scene.axes.visible {
                draw_axes(frame, viewport, camera, &self.scene.axes);
            }
            draw_annotations(frame, viewport, camera, self.annotations);
            if let Some(pick) = self.last_pick {
                draw_pick_marker(frame, viewport, camera, pick);
            }
        });

        vec![geometry]
    }
}

fn to_color(rgba: [f32; 4], opacity: f64) -> Color {
    Color::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3] * opacity as f32)
}

/// Color of one grid point under the actor's mapper
fn point_color(actor: &Actor, grid: &UnstructuredGrid, index: usize) -> Color {
    let opacity = actor.property.opacity;
    if let Some(active) = actor.mapper.color_array() {
        if active.association == FieldAssociation::Point {
            if let Some(array) = grid.point_array(&active.name) {
                if index < array.num_tuples() {
                    let value = array.tuple(index)[0];
                    if let Some(rgba) = actor.mapper.color_for(value) {
                        return to_color(rgba, opacity);
                    }
                }
            }
        }
    }
    theme::with_opacity(theme::SOLID_ACTOR, opacity)
}

/// Color of one cell: the cell scalar, or the mean of its point scalars
fn cell_color(actor: &Actor, grid: &UnstructuredGrid, cell_index: usize, cell: &[usize]) -> Color {
    let opacity = actor.property.opacity;
    if let Some(active) = actor.mapper.color_array() {
        let value = match active.association {
            FieldAssociation::Cell => grid
                .cell_array(&active.name)
                .filter(|array| cell_index < array.num_tuples())
                .map(|array| array.tuple(cell_index)[0]),
            FieldAssociation::Point => {
                grid.point_array(&active.name).and_then(|array| {
                    let tuples = array.num_tuples();
                    let mut sum = 0.0;
                    let mut n = 0usize;
                    for &v in cell {
                        if v < tuples {
                            sum += array.tuple(v)[0];
                            n += 1;
                        }
                    }
                    if n > 0 {
                        Some(sum / n as f64)
                    } else {
                        None
                    }
                })
            }
        };
        if let Some(value) = value {
            if let Some(rgba) = actor.mapper.color_for(value) {
                return to_color(rgba, opacity);
            }
        }
    }
    theme::with_opacity(theme::SOLID_ACTOR, opacity)
}

/// Project a cell's vertices; `None` when any vertex is unprojectable
fn project_cell(
    camera: &Camera,
    viewport: (f32, f32),
    points: &[DVec3],
    cell: &[usize],
) -> Option<Vec<Point>> {
    cell.iter()
        .map(|&v| {
            let p = *points.get(v)?;
            let (x, y, _) = camera.project(p, viewport)?;
            Some(Point::new(x, y))
        })
        .collect()
}

fn polygon(corners: &[Point]) -> Path {
    Path::new(|builder| {
        builder.move_to(corners[0]);
        for &corner in &corners[1..] {
            builder.line_to(corner);
        }
        builder.close();
    })
}

fn draw_grid_actor(
    frame: &mut Frame,
    viewport: (f32, f32),
    camera: &Camera,
    actor: &Actor,
    grid: &UnstructuredGrid,
    points: &[DVec3],
) {
    match actor.property.style {
        Style::Points => {
            let size = actor.property.point_size.max(1.0);
            for (i, &p) in points.iter().enumerate() {
                let Some((x, y, _)) = camera.project(p, viewport) else {
                    continue;
                };
                frame.fill_rectangle(
                    Point::new(x - size * 0.5, y - size * 0.5),
                    Size::new(size, size),
                    point_color(actor, grid, i),
                );
            }
        }
        Style::Wireframe => {
            for (ci, cell) in grid.cells.iter().enumerate() {
                let Some(corners) = project_cell(camera, viewport, points, cell) else {
                    continue;
                };
                if corners.len() < 2 {
                    continue;
                }
                frame.stroke(
                    &polygon(&corners),
                    Stroke::default()
                        .with_color(cell_color(actor, grid, ci, cell))
                        .with_width(1.0),
                );
            }
        }
        Style::Surface => {
            let edges = actor.property.edge_visibility;
            let edge_color = theme::with_opacity(theme::EDGE, actor.property.opacity);
            for (ci, cell) in grid.cells.iter().enumerate() {
                let Some(corners) = project_cell(camera, viewport, points, cell) else {
                    continue;
                };
                if corners.len() < 3 {
                    continue;
                }
                let path = polygon(&corners);
                frame.fill(&path, cell_color(actor, grid, ci, cell));
                if edges {
                    frame.stroke(&path, Stroke::default().with_color(edge_color).with_width(1.0));
                }
            }
        }
    }
}

fn draw_model(
    frame: &mut Frame,
    viewport: (f32, f32),
    camera: &Camera,
    actor: &Actor,
    model: &SurfaceModel,
) {
    let opacity = actor.property.opacity;
    let fill = theme::with_opacity(theme::MODEL_SURFACE, opacity);
    let edge_color = theme::with_opacity(theme::EDGE, opacity);

    match actor.property.style {
        Style::Points => {
            let size = actor.property.point_size.max(1.0);
            for &p in &model.positions {
                let Some((x, y, _)) = camera.project(p, viewport) else {
                    continue;
                };
                frame.fill_rectangle(
                    Point::new(x - size * 0.5, y - size * 0.5),
                    Size::new(size, size),
                    fill,
                );
            }
        }
        style => {
            for triangle in &model.triangles {
                let corners: Option<Vec<Point>> = triangle
                    .iter()
                    .map(|corner| {
                        let p = *model.positions.get(corner.position)?;
                        let (x, y, _) = camera.project(p, viewport)?;
                        Some(Point::new(x, y))
                    })
                    .collect();
                let Some(corners) = corners else {
                    continue;
                };
                let path = polygon(&corners);
                match style {
                    Style::Wireframe => {
                        frame.stroke(&path, Stroke::default().with_color(fill).with_width(1.0));
                    }
                    _ => {
                        frame.fill(&path, fill);
                        if actor.property.edge_visibility {
                            frame.stroke(
                                &path,
                                Stroke::default().with_color(edge_color).with_width(1.0),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Edges of a box as corner index pairs (corner bit i selects min/max on
/// axis i)
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (0, 2), (0, 4),
    (3, 1), (3, 2), (3, 7),
    (5, 1), (5, 4), (5, 7),
    (6, 2), (6, 4), (6, 7),
];

fn draw_axes(
    frame: &mut Frame,
    viewport: (f32, f32),
    camera: &Camera,
    axes: &strata_core::scene::AxesActor,
) {
    let Some(bounds) = axes.bounds else {
        return;
    };

    let corners: Vec<Option<Point>> = (0..8)
        .map(|i| {
            let p = DVec3::new(
                if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
                if i & 2 == 0 { bounds.min.y } else { bounds.max.y },
                if i & 4 == 0 { bounds.min.z } else { bounds.max.z },
            );
            camera
                .project(p, viewport)
                .map(|(x, y, _)| Point::new(x, y))
        })
        .collect();

    for &(a, b) in &BOX_EDGES {
        if let (Some(from), Some(to)) = (corners[a], corners[b]) {
            frame.stroke(
                &Path::line(from, to),
                Stroke::default().with_color(theme::AXES).with_width(1.0),
            );
        }
    }

    // Extent labels along the three axes leaving the min corner
    let precision = axes.label_precision;
    let labels = [
        (1, format!("X {:.p$} .. {:.p$}", bounds.min.x, bounds.max.x, p = precision)),
        (2, format!("Y {:.p$} .. {:.p$}", bounds.min.y, bounds.max.y, p = precision)),
        (4, format!("Z {:.p$} .. {:.p$}", bounds.min.z, bounds.max.z, p = precision)),
    ];
    for (corner, content) in labels {
        let (Some(from), Some(to)) = (corners[0], corners[corner]) else {
            continue;
        };
        frame.fill_text(Text {
            content,
            position: Point::new((from.x + to.x) * 0.5, (from.y + to.y) * 0.5 - 4.0),
            size: 12.0.into(),
            color: theme::AXES,
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Bottom.into(),
            ..Text::default()
        });
    }
}

fn draw_annotations(
    frame: &mut Frame,
    viewport: (f32, f32),
    camera: &Camera,
    annotations: &[Annotation],
) {
    for annotation in annotations {
        let Some((x, y, _)) = camera.project(annotation.position(), viewport) else {
            continue;
        };
        let center = Point::new(x, y);
        frame.fill(&Path::circle(center, 4.0), theme::ANNOTATION);
        frame.fill_text(Text {
            content: annotation.name.clone(),
            position: Point::new(x + 6.0, y - 6.0),
            size: 12.0.into(),
            color: theme::ANNOTATION,
            align_x: Horizontal::Left.into(),
            align_y: Vertical::Bottom.into(),
            ..Text::default()
        });
    }
}

fn draw_pick_marker(
    frame: &mut Frame,
    viewport: (f32, f32),
    camera: &Camera,
    pick: PickedPoint,
) {
    let Some((x, y, _)) = camera.project(pick.position, viewport) else {
        return;
    };
    let stroke = Stroke::default().with_color(theme::PICK_MARKER).with_width(1.5);
    frame.stroke(&Path::circle(Point::new(x, y), 6.0), stroke.clone());
    frame.stroke(
        &Path::line(Point::new(x - 10.0, y), Point::new(x + 10.0, y)),
        stroke.clone(),
    );
    frame.stroke(
        &Path::line(Point::new(x, y - 10.0), Point::new(x, y + 10.0)),
        stroke,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_click_threshold() {
        assert!(is_short_click(Duration::from_millis(0)));
        assert!(is_short_click(Duration::from_millis(99)));
        assert!(!is_short_click(Duration::from_millis(100)));
        assert!(!is_short_click(Duration::from_millis(500)));
    }
}
