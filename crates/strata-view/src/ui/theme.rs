//! Visual constants for the dashboard

use iced::Color;

/// Viewport background (ghost white)
pub const BACKGROUND: Color = Color::from_rgb(0.973, 0.973, 1.0);

/// Solid color for actors without scalar coloring
pub const SOLID_ACTOR: Color = Color::from_rgb(0.78, 0.78, 0.82);

/// Untextured fill for the surveyed site model
pub const MODEL_SURFACE: Color = Color::from_rgb(0.76, 0.70, 0.58);

/// Edge strokes for surface-with-edges and wireframe-adjacent drawing
pub const EDGE: Color = Color::from_rgb(0.25, 0.25, 0.3);

/// Axes box strokes and labels
pub const AXES: Color = Color::from_rgb(0.45, 0.45, 0.5);

/// Annotation markers
pub const ANNOTATION: Color = Color::from_rgb(0.85, 0.25, 0.15);

/// Most recent pick marker
pub const PICK_MARKER: Color = Color::from_rgb(0.1, 0.35, 0.8);

/// Scale a color's alpha, leaving the channels untouched
pub fn with_opacity(color: Color, opacity: f64) -> Color {
    Color {
        a: color.a * opacity as f32,
        ..color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_opacity() {
        let faded = with_opacity(EDGE, 0.5);
        assert!((faded.a - 0.5).abs() < 1e-6);
        assert_eq!(faded.r, EDGE.r);
    }
}
