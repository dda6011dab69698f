//! Scalar-coloring parameters for one actor

use crate::color::{HsvRanges, LookupTable};
use crate::dataset::{FieldAssociation, FieldDescriptor};

use super::SceneError;

/// The active scalar source of a mapper
#[derive(Debug, Clone, PartialEq)]
pub struct ColorArray {
    pub name: String,
    pub association: FieldAssociation,
}

/// Maps dataset scalars to colors for one actor
#[derive(Debug, Clone)]
pub struct Mapper {
    lut: LookupTable,
    color_array: Option<ColorArray>,
    scalar_visibility: bool,
    use_lut_scalar_range: bool,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper {
    pub fn new() -> Self {
        Self {
            lut: LookupTable::new(),
            color_array: None,
            scalar_visibility: false,
            use_lut_scalar_range: false,
        }
    }

    /// Color by the given field: sets the active table range to the
    /// field's value range, selects the array by name, and records the
    /// association.
    pub fn color_by_field(&mut self, field: &FieldDescriptor) {
        let (min, max) = field.range;
        self.lut.set_range(min, max);
        self.color_array = Some(ColorArray {
            name: field.name.clone(),
            association: field.association,
        });
        self.scalar_visibility = true;
        self.use_lut_scalar_range = true;
    }

    /// Replace the table's continuous configuration and rebuild its
    /// discretized entries
    pub fn apply_hsv_ranges(&mut self, hsv: HsvRanges) {
        self.lut.set_hsv_ranges(hsv);
        self.lut.build();
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.lut
    }

    pub fn color_array(&self) -> Option<&ColorArray> {
        self.color_array.as_ref()
    }

    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    /// Color for one scalar value, or `None` when scalar coloring is off
    pub fn color_for(&self, scalar: f64) -> Option<[f32; 4]> {
        if !self.scalar_visibility {
            return None;
        }
        Some(self.lut.map_value(scalar))
    }
}

/// Look up a field descriptor by catalog index.
///
/// An index outside the catalog is an error, never a clamp.
pub fn select_field(
    catalog: &[FieldDescriptor],
    index: usize,
) -> Result<&FieldDescriptor, SceneError> {
    catalog.get(index).ok_or(SceneError::FieldIndexOutOfRange {
        index,
        len: catalog.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LutPreset;

    fn two_field_catalog() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                name: "Pressure".to_string(),
                index: 0,
                range: (0.0, 100.0),
                association: FieldAssociation::Point,
            },
            FieldDescriptor {
                name: "Stress".to_string(),
                index: 1,
                range: (-50.0, 50.0),
                association: FieldAssociation::Cell,
            },
        ]
    }

    #[test]
    fn test_color_by_field_sets_exact_range() {
        let catalog = two_field_catalog();
        let mut mapper = Mapper::new();

        mapper.color_by_field(select_field(&catalog, 1).unwrap());
        assert_eq!(mapper.lookup_table().range(), (-50.0, 50.0));
        let active = mapper.color_array().unwrap();
        assert_eq!(active.name, "Stress");
        assert_eq!(active.association, FieldAssociation::Cell);
        assert!(mapper.scalar_visibility());
    }

    #[test]
    fn test_select_field_out_of_range() {
        let catalog = two_field_catalog();
        let err = select_field(&catalog, 2).unwrap_err();
        assert!(matches!(
            err,
            SceneError::FieldIndexOutOfRange { index: 2, len: 2 }
        ));
    }

    #[test]
    fn test_preset_application_round_trip() {
        let mut mapper = Mapper::new();
        mapper.apply_hsv_ranges(LutPreset::Greyscale.hsv_ranges());
        let first = mapper.lookup_table().clone();

        mapper.apply_hsv_ranges(LutPreset::Greyscale.hsv_ranges());
        assert_eq!(mapper.lookup_table().hsv_ranges(), first.hsv_ranges());
        assert_eq!(mapper.lookup_table().table(), first.table());
    }

    #[test]
    fn test_color_for_requires_scalar_visibility() {
        let mut mapper = Mapper::new();
        assert!(mapper.color_for(1.0).is_none());

        let catalog = two_field_catalog();
        mapper.color_by_field(&catalog[0]);
        assert!(mapper.color_for(1.0).is_some());
    }
}
