//! Color map presets and lookup-table construction
//!
//! A lookup table maps a scalar value range to colors through linearly
//! interpolated hue/saturation/value ranges. Presets resolve to a complete
//! HSV configuration that is applied to a table wholesale and then
//! discretized by `build()`; the table is never partially mutated.

use serde::{Deserialize, Serialize};

/// Number of discretized color entries built from the continuous ranges
pub const DEFAULT_TABLE_SIZE: usize = 256;

/// Built-in color map presets selectable from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LutPreset {
    #[default]
    Rainbow,
    InvertedRainbow,
    Greyscale,
    InvertedGreyscale,
}

/// Raised when a persisted preset id does not name a known preset.
///
/// The id form only exists at the edges (stored settings, legacy widget
/// values); inside the crate the enum makes an unknown preset
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown color preset id {0}")]
pub struct UnknownPreset(pub i64);

impl LutPreset {
    pub const ALL: [LutPreset; 4] = [
        LutPreset::Rainbow,
        LutPreset::InvertedRainbow,
        LutPreset::Greyscale,
        LutPreset::InvertedGreyscale,
    ];

    /// Resolve the preset to its continuous color mapping configuration.
    ///
    /// Pure function: same preset in, bitwise-identical ranges out.
    pub fn hsv_ranges(self) -> HsvRanges {
        match self {
            LutPreset::Rainbow => HsvRanges {
                hue: (0.666, 0.0),
                saturation: (1.0, 1.0),
                value: (1.0, 1.0),
            },
            LutPreset::InvertedRainbow => HsvRanges {
                hue: (0.0, 0.666),
                saturation: (1.0, 1.0),
                value: (1.0, 1.0),
            },
            LutPreset::Greyscale => HsvRanges {
                hue: (0.0, 0.0),
                saturation: (0.0, 0.0),
                value: (0.0, 1.0),
            },
            LutPreset::InvertedGreyscale => HsvRanges {
                hue: (0.0, 0.666),
                saturation: (0.0, 0.0),
                value: (1.0, 0.0),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LutPreset::Rainbow => "Rainbow",
            LutPreset::InvertedRainbow => "Inv Rainbow",
            LutPreset::Greyscale => "Greyscale",
            LutPreset::InvertedGreyscale => "Inv Greyscale",
        }
    }
}

impl std::fmt::Display for LutPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i64> for LutPreset {
    type Error = UnknownPreset;

    fn try_from(id: i64) -> Result<Self, UnknownPreset> {
        match id {
            0 => Ok(LutPreset::Rainbow),
            1 => Ok(LutPreset::InvertedRainbow),
            2 => Ok(LutPreset::Greyscale),
            3 => Ok(LutPreset::InvertedGreyscale),
            other => Err(UnknownPreset(other)),
        }
    }
}

/// Continuous color mapping configuration: three closed ranges, each
/// endpoint in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvRanges {
    pub hue: (f64, f64),
    pub saturation: (f64, f64),
    pub value: (f64, f64),
}

/// Scalar-to-color lookup table
///
/// Holds the continuous HSV ranges, the active scalar range, and the
/// discretized RGBA entries produced by the last `build()`.
#[derive(Debug, Clone)]
pub struct LookupTable {
    hsv: HsvRanges,
    range: (f64, f64),
    size: usize,
    table: Vec<[f32; 4]>,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTable {
    /// A rainbow table over the unit range, already built
    pub fn new() -> Self {
        let mut lut = Self {
            hsv: LutPreset::Rainbow.hsv_ranges(),
            range: (0.0, 1.0),
            size: DEFAULT_TABLE_SIZE,
            table: Vec::new(),
        };
        lut.build();
        lut
    }

    /// Replace the continuous configuration wholesale.
    ///
    /// The discretized entries are stale until the next `build()`.
    pub fn set_hsv_ranges(&mut self, hsv: HsvRanges) {
        self.hsv = hsv;
    }

    pub fn hsv_ranges(&self) -> HsvRanges {
        self.hsv
    }

    /// Set the scalar range mapped across the table
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.range = (min, max);
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Materialize the discretized entries from the continuous ranges.
    ///
    /// Entry `i` interpolates each HSV channel at `i / (size - 1)`.
    pub fn build(&mut self) {
        let size = self.size.max(2);
        let mut table = Vec::with_capacity(size);
        for i in 0..size {
            let t = i as f64 / (size - 1) as f64;
            let h = lerp(self.hsv.hue, t);
            let s = lerp(self.hsv.saturation, t);
            let v = lerp(self.hsv.value, t);
            let (r, g, b) = hsv_to_rgb(h, s, v);
            table.push([r as f32, g as f32, b as f32, 1.0]);
        }
        self.table = table;
    }

    pub fn table(&self) -> &[[f32; 4]] {
        &self.table
    }

    /// Map a scalar to a color, clamping into the active range.
    ///
    /// A degenerate range (min == max) maps everything to the first entry.
    pub fn map_value(&self, scalar: f64) -> [f32; 4] {
        let (min, max) = self.range;
        if !(max > min) || self.table.is_empty() {
            return self.table.first().copied().unwrap_or([0.0, 0.0, 0.0, 1.0]);
        }
        let t = ((scalar - min) / (max - min)).clamp(0.0, 1.0);
        let idx = (t * (self.table.len() - 1) as f64).round() as usize;
        self.table[idx]
    }
}

fn lerp(range: (f64, f64), t: f64) -> f64 {
    range.0 + (range.1 - range.0) * t
}

/// HSV to RGB, hue in `[0, 1]` (wraps), saturation and value in `[0, 1]`
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let h = (h.rem_euclid(1.0)) * 6.0;
    let sector = (h.floor() as usize) % 6;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_ranges() {
        let hsv = LutPreset::Rainbow.hsv_ranges();
        assert_eq!(hsv.hue, (0.666, 0.0));
        assert_eq!(hsv.saturation, (1.0, 1.0));
        assert_eq!(hsv.value, (1.0, 1.0));
    }

    #[test]
    fn test_inverted_rainbow_ranges() {
        let hsv = LutPreset::InvertedRainbow.hsv_ranges();
        assert_eq!(hsv.hue, (0.0, 0.666));
        assert_eq!(hsv.saturation, (1.0, 1.0));
        assert_eq!(hsv.value, (1.0, 1.0));
    }

    #[test]
    fn test_greyscale_ranges() {
        let hsv = LutPreset::Greyscale.hsv_ranges();
        assert_eq!(hsv.hue, (0.0, 0.0));
        assert_eq!(hsv.saturation, (0.0, 0.0));
        assert_eq!(hsv.value, (0.0, 1.0));
    }

    #[test]
    fn test_inverted_greyscale_ranges() {
        let hsv = LutPreset::InvertedGreyscale.hsv_ranges();
        assert_eq!(hsv.hue, (0.0, 0.666));
        assert_eq!(hsv.saturation, (0.0, 0.0));
        assert_eq!(hsv.value, (1.0, 0.0));
    }

    #[test]
    fn test_resolution_is_pure() {
        for preset in LutPreset::ALL {
            assert_eq!(preset.hsv_ranges(), preset.hsv_ranges());
        }
    }

    #[test]
    fn test_preset_id_round_trip() {
        assert_eq!(LutPreset::try_from(0), Ok(LutPreset::Rainbow));
        assert_eq!(LutPreset::try_from(3), Ok(LutPreset::InvertedGreyscale));
        assert_eq!(LutPreset::try_from(4), Err(UnknownPreset(4)));
        assert_eq!(LutPreset::try_from(-1), Err(UnknownPreset(-1)));
    }

    #[test]
    fn test_apply_rebuild_is_bitwise_identical() {
        let mut first = LookupTable::new();
        first.set_hsv_ranges(LutPreset::InvertedGreyscale.hsv_ranges());
        first.build();

        let mut second = LookupTable::new();
        second.set_hsv_ranges(LutPreset::InvertedGreyscale.hsv_ranges());
        second.build();

        assert_eq!(first.hsv_ranges(), second.hsv_ranges());
        assert_eq!(first.table(), second.table());
    }

    #[test]
    fn test_greyscale_build_endpoints() {
        let mut lut = LookupTable::new();
        lut.set_hsv_ranges(LutPreset::Greyscale.hsv_ranges());
        lut.build();
        // Value ramps 0 -> 1 with zero saturation: black to white
        assert_eq!(lut.table()[0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut.table()[DEFAULT_TABLE_SIZE - 1], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_inverted_greyscale_build_endpoints() {
        let mut lut = LookupTable::new();
        lut.set_hsv_ranges(LutPreset::InvertedGreyscale.hsv_ranges());
        lut.build();
        assert_eq!(lut.table()[0], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(lut.table()[DEFAULT_TABLE_SIZE - 1], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rainbow_build_endpoints() {
        let lut = LookupTable::new();
        let first = lut.table()[0];
        let last = lut.table()[DEFAULT_TABLE_SIZE - 1];
        // Hue 0.666 is blue, hue 0.0 is red
        assert!(first[2] > 0.9 && first[0] < 0.1);
        assert!(last[0] > 0.9 && last[2] < 0.1);
    }

    #[test]
    fn test_map_value_clamps_to_range() {
        let mut lut = LookupTable::new();
        lut.set_range(-50.0, 50.0);
        assert_eq!(lut.map_value(-100.0), lut.table()[0]);
        assert_eq!(lut.map_value(100.0), lut.table()[DEFAULT_TABLE_SIZE - 1]);
        assert_eq!(lut.map_value(0.0), lut.map_value(0.0));
    }

    #[test]
    fn test_map_value_degenerate_range() {
        let mut lut = LookupTable::new();
        lut.set_range(5.0, 5.0);
        assert_eq!(lut.map_value(5.0), lut.table()[0]);
        assert_eq!(lut.map_value(9.0), lut.table()[0]);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        let (r, g, b) = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!((r - 0.0).abs() < 1e-9 && (g - 1.0).abs() < 1e-9 && (b - 0.0).abs() < 1e-9);
        let (r, g, b) = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert!((r - 0.0).abs() < 1e-9 && (g - 0.0).abs() < 1e-9 && (b - 1.0).abs() < 1e-9);
    }
}
