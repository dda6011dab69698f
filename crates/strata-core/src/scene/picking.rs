//! Single-shot point picking
//!
//! A pick projects candidate points through the camera and selects the one
//! nearest to the click within a fixed pixel tolerance. A click with
//! nothing in tolerance yields `None`; there is no stale or fabricated
//! position.

use glam::DVec3;

use super::Camera;

/// Pixel radius inside which a point counts as hit
pub const DEFAULT_PICK_TOLERANCE: f32 = 8.0;

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickedPoint {
    /// Index into the candidate set that was picked
    pub point_id: usize,
    /// World position of the picked point
    pub position: DVec3,
    /// Screen-space distance from the click in pixels
    pub screen_distance: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct PointPicker {
    pub tolerance: f32,
}

impl Default for PointPicker {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_PICK_TOLERANCE,
        }
    }
}

impl PointPicker {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Pick the candidate nearest to `screen` within the tolerance.
    ///
    /// Ties on screen distance go to the point nearer the camera.
    pub fn pick(
        &self,
        screen: (f32, f32),
        viewport: (f32, f32),
        camera: &Camera,
        candidates: &[DVec3],
    ) -> Option<PickedPoint> {
        let (cx, cy) = screen;
        let mut best: Option<(f32, f64, usize, DVec3)> = None;

        for (id, &point) in candidates.iter().enumerate() {
            let Some((px, py, depth)) = camera.project(point, viewport) else {
                continue;
            };
            let distance = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            if distance > self.tolerance {
                continue;
            }
            let closer = match best {
                None => true,
                Some((best_distance, best_depth, _, _)) => {
                    distance < best_distance
                        || (distance == best_distance && depth < best_depth)
                }
            };
            if closer {
                best = Some((distance, depth, id, point));
            }
        }

        best.map(|(screen_distance, _, point_id, position)| PickedPoint {
            point_id,
            position,
            screen_distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            clipping_range: (0.1, 100.0),
            view_angle: 45.0,
        }
    }

    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    #[test]
    fn test_pick_nearest_point() {
        let camera = camera();
        let candidates = vec![DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0)];
        let picker = PointPicker::default();

        let hit = picker
            .pick((400.0, 300.0), VIEWPORT, &camera, &candidates)
            .unwrap();
        assert_eq!(hit.point_id, 0);
        assert_eq!(hit.position, DVec3::ZERO);
        assert!(hit.screen_distance < 1.0);
    }

    #[test]
    fn test_nothing_under_cursor() {
        let camera = camera();
        let candidates = vec![DVec3::ZERO];
        let picker = PointPicker::default();

        assert!(picker
            .pick((50.0, 50.0), VIEWPORT, &camera, &candidates)
            .is_none());
    }

    #[test]
    fn test_empty_candidates() {
        let camera = camera();
        let picker = PointPicker::default();
        assert!(picker.pick((400.0, 300.0), VIEWPORT, &camera, &[]).is_none());
    }

    #[test]
    fn test_depth_breaks_screen_ties() {
        let camera = camera();
        // Both project onto the viewport center; the nearer one wins
        let candidates = vec![DVec3::new(0.0, 0.0, -5.0), DVec3::new(0.0, 0.0, 5.0)];
        let picker = PointPicker::default();

        let hit = picker
            .pick((400.0, 300.0), VIEWPORT, &camera, &candidates)
            .unwrap();
        assert_eq!(hit.point_id, 1);
    }

    #[test]
    fn test_points_behind_camera_ignored() {
        let camera = camera();
        let candidates = vec![DVec3::new(0.0, 0.0, 20.0)];
        let picker = PointPicker::default();
        assert!(picker
            .pick((400.0, 300.0), VIEWPORT, &camera, &candidates)
            .is_none());
    }
}
