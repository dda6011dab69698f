//! Camera parameters and world-to-viewport projection

use glam::{DMat4, DVec3};

use crate::types::Bounds;

/// Perspective camera.
///
/// The initial pose comes from configuration; `reset` re-frames the
/// current view direction onto a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub focal_point: DVec3,
    pub view_up: DVec3,
    /// (near, far) clip distances
    pub clipping_range: (f64, f64),
    /// Vertical view angle in degrees
    pub view_angle: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            clipping_range: (0.01, 1000.01),
            view_angle: 30.0,
        }
    }
}

impl Camera {
    pub fn view_proj(&self, aspect: f64) -> DMat4 {
        let view = DMat4::look_at_rh(self.position, self.focal_point, self.view_up);
        let proj = DMat4::perspective_rh(
            self.view_angle.to_radians(),
            aspect,
            self.clipping_range.0,
            self.clipping_range.1,
        );
        proj * view
    }

    /// Project a world point into viewport pixels.
    ///
    /// Returns `(x, y, depth)` with y growing downwards, or `None` when
    /// the point is on or behind the camera plane or the viewport is
    /// degenerate. The depth is the normalized-device z, usable for
    /// near-to-far ordering.
    pub fn project(&self, point: DVec3, viewport: (f32, f32)) -> Option<(f32, f32, f64)> {
        let (width, height) = viewport;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let clip = self.view_proj(width as f64 / height as f64) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = ((ndc.x + 1.0) * 0.5) as f32 * width;
        let y = ((1.0 - ndc.y) * 0.5) as f32 * height;
        Some((x, y, ndc.z))
    }

    /// Re-frame the camera onto a bounding box, keeping the current view
    /// direction. Near/far planes follow the framing distance.
    pub fn reset(&mut self, bounds: Bounds) {
        let center = bounds.center();
        let max_dim = bounds.max_dimension().max(f64::EPSILON);

        let padding = 1.2;
        let half_angle = (self.view_angle.to_radians() * 0.5).tan().max(1e-6);
        let distance = (max_dim * padding) / half_angle;

        let direction = (self.position - self.focal_point).normalize_or_zero();
        let direction = if direction == DVec3::ZERO {
            DVec3::new(1.0, -1.0, 1.0).normalize()
        } else {
            direction
        };

        self.focal_point = center;
        self.position = center + direction * distance;
        self.clipping_range = (distance * 0.01, distance * 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_z() -> Camera {
        Camera {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            clipping_range: (0.1, 100.0),
            view_angle: 45.0,
        }
    }

    #[test]
    fn test_focal_point_projects_to_viewport_center() {
        let camera = looking_down_z();
        let (x, y, _) = camera.project(DVec3::ZERO, (800.0, 600.0)).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = looking_down_z();
        assert!(camera.project(DVec3::new(0.0, 0.0, 20.0), (800.0, 600.0)).is_none());
    }

    #[test]
    fn test_up_is_screen_up() {
        let camera = looking_down_z();
        let (_, y_center, _) = camera.project(DVec3::ZERO, (800.0, 600.0)).unwrap();
        let (_, y_up, _) = camera.project(DVec3::new(0.0, 1.0, 0.0), (800.0, 600.0)).unwrap();
        assert!(y_up < y_center);
    }

    #[test]
    fn test_degenerate_viewport() {
        let camera = looking_down_z();
        assert!(camera.project(DVec3::ZERO, (0.0, 600.0)).is_none());
    }

    #[test]
    fn test_reset_frames_bounds() {
        let mut camera = looking_down_z();
        let bounds = Bounds {
            min: DVec3::new(-5.0, -5.0, -5.0),
            max: DVec3::new(5.0, 5.0, 5.0),
        };
        camera.reset(bounds);
        assert_eq!(camera.focal_point, DVec3::ZERO);
        // Direction preserved: still on the +Z side
        assert!(camera.position.z > 0.0);
        assert!(camera.clipping_range.0 < camera.clipping_range.1);

        // Every corner lands inside the viewport
        for &x in &[bounds.min.x, bounds.max.x] {
            for &y in &[bounds.min.y, bounds.max.y] {
                for &z in &[bounds.min.z, bounds.max.z] {
                    let (sx, sy, _) = camera
                        .project(DVec3::new(x, y, z), (800.0, 600.0))
                        .unwrap();
                    assert!((0.0..=800.0).contains(&sx));
                    assert!((0.0..=600.0).contains(&sy));
                }
            }
        }
    }
}
