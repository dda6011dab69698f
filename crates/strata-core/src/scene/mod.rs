//! Scene parameter model
//!
//! Owns the render-backend-facing state: actors with their visual
//! properties and mappers, the axes overlay, the camera, and the repaint
//! signal. All mutation happens from the single UI event thread; nothing
//! here is shared across threads.

mod camera;
mod mapper;
mod picking;
mod warp;

pub use camera::Camera;
pub use mapper::{select_field, ColorArray, Mapper};
pub use picking::{PickedPoint, PointPicker, DEFAULT_PICK_TOLERANCE};
pub use warp::WarpVector;

use crate::types::Bounds;

/// Scene-level errors
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("field index {index} out of range ({len} fields)")]
    FieldIndexOutOfRange { index: usize, len: usize },

    #[error("no point vector array named '{0}'")]
    MissingVectorArray(String),

    #[error("array '{name}' has {components} components, expected at least 3")]
    NotAVectorArray { name: String, components: usize },
}

/// Base drawing style of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Points,
    Wireframe,
    Surface,
}

/// Visual properties of an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    pub style: Style,
    pub point_size: f32,
    pub edge_visibility: bool,
    pub opacity: f64,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            style: Style::Surface,
            point_size: 1.0,
            edge_visibility: false,
            opacity: 1.0,
        }
    }
}

/// User-facing representation modes.
///
/// Selecting a mode is a total overwrite of the target's style attributes,
/// so applying the same mode twice is a no-op. Any mode may follow any
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Points,
    Wireframe,
    Surface,
    SurfaceWithEdges,
}

impl Representation {
    pub const ALL: [Representation; 4] = [
        Representation::Points,
        Representation::Wireframe,
        Representation::Surface,
        Representation::SurfaceWithEdges,
    ];

    pub fn apply(self, property: &mut Property) {
        match self {
            Representation::Points => {
                property.style = Style::Points;
                property.point_size = 1.0;
                property.edge_visibility = false;
            }
            Representation::Wireframe => {
                property.style = Style::Wireframe;
                property.point_size = 1.0;
                property.edge_visibility = false;
            }
            Representation::Surface => {
                property.style = Style::Surface;
                property.point_size = 1.0;
                property.edge_visibility = false;
            }
            Representation::SurfaceWithEdges => {
                property.style = Style::Surface;
                property.point_size = 1.0;
                property.edge_visibility = true;
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Representation::Points => "Points",
            Representation::Wireframe => "Wireframe",
            Representation::Surface => "Surface",
            Representation::SurfaceWithEdges => "Surface with edges",
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A renderable object: scalar-coloring parameters plus visual style
#[derive(Debug, Clone)]
pub struct Actor {
    pub mapper: Mapper,
    pub property: Property,
    pub visible: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    pub fn new() -> Self {
        Self {
            mapper: Mapper::new(),
            property: Property::default(),
            visible: true,
        }
    }
}

/// Bounding-box axes overlay
#[derive(Debug, Clone)]
pub struct AxesActor {
    pub bounds: Option<Bounds>,
    pub visible: bool,
    /// Decimal places on the extent labels
    pub label_precision: usize,
}

impl Default for AxesActor {
    fn default() -> Self {
        Self {
            bounds: None,
            visible: true,
            label_precision: 1,
        }
    }
}

/// The full scene: one actor per pipeline node, axes, camera, and the
/// repaint signal.
///
/// Repaint requests are dropped until `mark_ready()` is called once the
/// synchronous startup load and pipeline setup have completed; afterwards
/// every request bumps the generation exactly once.
#[derive(Debug, Clone)]
pub struct Scene {
    pub mesh: Actor,
    pub warp: Actor,
    pub model: Actor,
    pub axes: AxesActor,
    pub camera: Camera,
    ready: bool,
    repaint_generation: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            mesh: Actor::new(),
            warp: Actor::new(),
            model: Actor::new(),
            axes: AxesActor::default(),
            camera: Camera::default(),
            ready: false,
            repaint_generation: 0,
        }
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Signal a view refresh. No-op before `mark_ready()`.
    pub fn request_repaint(&mut self) {
        if self.ready {
            self.repaint_generation += 1;
        }
    }

    pub fn repaint_generation(&self) -> u64 {
        self.repaint_generation
    }

    /// Apply a representation mode to the mesh actor and its warped
    /// counterpart. The shared application is deliberate: both views of
    /// the dataset always use the same style.
    pub fn set_representation(&mut self, representation: Representation) {
        representation.apply(&mut self.mesh.property);
        representation.apply(&mut self.warp.property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_is_total_overwrite() {
        let mut property = Property {
            style: Style::Points,
            point_size: 4.0,
            edge_visibility: true,
            opacity: 0.5,
        };
        Representation::Surface.apply(&mut property);
        assert_eq!(property.style, Style::Surface);
        assert_eq!(property.point_size, 1.0);
        assert!(!property.edge_visibility);
        // Opacity is not a representation attribute
        assert_eq!(property.opacity, 0.5);
    }

    #[test]
    fn test_representation_idempotent() {
        let mut property = Property::default();
        Representation::SurfaceWithEdges.apply(&mut property);
        let after_first = property;
        Representation::SurfaceWithEdges.apply(&mut property);
        assert_eq!(property, after_first);
    }

    #[test]
    fn test_all_transitions_allowed() {
        let mut property = Property::default();
        for from in Representation::ALL {
            for to in Representation::ALL {
                from.apply(&mut property);
                to.apply(&mut property);
                let expected_edges = to == Representation::SurfaceWithEdges;
                assert_eq!(property.edge_visibility, expected_edges);
                assert_eq!(property.point_size, 1.0);
            }
        }
    }

    #[test]
    fn test_representation_couples_mesh_and_warp() {
        let mut scene = Scene::new();
        scene.set_representation(Representation::Wireframe);
        assert_eq!(scene.mesh.property.style, Style::Wireframe);
        assert_eq!(scene.warp.property.style, Style::Wireframe);
        // The surveyed model keeps its own style
        assert_eq!(scene.model.property.style, Style::Surface);
    }

    #[test]
    fn test_repaint_dropped_until_ready() {
        let mut scene = Scene::new();
        scene.request_repaint();
        scene.request_repaint();
        assert_eq!(scene.repaint_generation(), 0);

        scene.mark_ready();
        scene.request_repaint();
        assert_eq!(scene.repaint_generation(), 1);
        scene.request_repaint();
        assert_eq!(scene.repaint_generation(), 2);
    }
}
