//! Reader for legacy ASCII VTK unstructured-grid files
//!
//! Supports the subset the monitoring exports use: POINTS, CELLS,
//! CELL_TYPES, and POINT_DATA / CELL_DATA sections carrying SCALARS
//! (with their LOOKUP_TABLE line), VECTORS, and FIELD arrays. Binary
//! files and other dataset kinds are rejected.

use std::path::Path;

use glam::DVec3;

use super::{DataArray, DatasetError, UnstructuredGrid};

/// Read and parse an unstructured grid from a file path
pub fn read_legacy_vtk(path: &Path) -> Result<UnstructuredGrid, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_legacy_vtk(&text)
}

/// Parse an unstructured grid from file contents
pub fn parse_legacy_vtk(text: &str) -> Result<UnstructuredGrid, DatasetError> {
    let mut lines = text.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| DatasetError::parse(1, "empty file"))?;
    if !header.trim_start().starts_with("# vtk DataFile") {
        return Err(DatasetError::parse(1, "missing '# vtk DataFile' header"));
    }

    // Line 2 is a free-form title, skipped whole
    lines
        .next()
        .ok_or_else(|| DatasetError::parse(2, "missing title line"))?;

    let (format_line_no, format) = lines
        .next()
        .ok_or_else(|| DatasetError::parse(3, "missing format line"))?;
    if !format.trim().eq_ignore_ascii_case("ASCII") {
        return Err(DatasetError::parse(
            format_line_no + 1,
            format!("unsupported format '{}', only ASCII is handled", format.trim()),
        ));
    }

    let mut tokens = Tokens::new(lines);

    tokens.expect_keyword("DATASET")?;
    let (kind, _) = tokens.next_token()?;
    if kind != "UNSTRUCTURED_GRID" {
        return Err(DatasetError::UnsupportedDataset(kind.to_string()));
    }

    let mut grid = UnstructuredGrid::default();
    // Which attribute block tuples currently belong to (POINT_DATA vs
    // CELL_DATA), along with the declared tuple count
    let mut section: Option<(bool, usize)> = None;

    while let Some((token, line)) = tokens.peek() {
        let token = token.to_string();
        tokens.advance();
        match token.as_str() {
            "POINTS" => {
                let count: usize = tokens.parse_next()?;
                let _dtype = tokens.next_token()?;
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    let x: f64 = tokens.parse_next()?;
                    let y: f64 = tokens.parse_next()?;
                    let z: f64 = tokens.parse_next()?;
                    points.push(DVec3::new(x, y, z));
                }
                grid.points = points;
            }
            "CELLS" => {
                let count: usize = tokens.parse_next()?;
                let _total: usize = tokens.parse_next()?;
                let mut cells = Vec::with_capacity(count);
                for _ in 0..count {
                    let len: usize = tokens.parse_next()?;
                    let mut cell = Vec::with_capacity(len);
                    for _ in 0..len {
                        let idx: usize = tokens.parse_next()?;
                        if idx >= grid.points.len() {
                            return Err(DatasetError::parse(
                                tokens.current_line(),
                                format!("cell vertex index {} out of range", idx),
                            ));
                        }
                        cell.push(idx);
                    }
                    cells.push(cell);
                }
                grid.cells = cells;
            }
            "CELL_TYPES" => {
                let count: usize = tokens.parse_next()?;
                for _ in 0..count {
                    let _type_id: i64 = tokens.parse_next()?;
                }
            }
            "POINT_DATA" => {
                let count: usize = tokens.parse_next()?;
                section = Some((true, count));
            }
            "CELL_DATA" => {
                let count: usize = tokens.parse_next()?;
                section = Some((false, count));
            }
            "SCALARS" => {
                let (is_point, tuples) = expect_section(section, line)?;
                let (name, _) = tokens.next_token()?;
                let name = name.to_string();
                let _dtype = tokens.next_token()?;
                // Optional component count (1-4), then the mandatory
                // LOOKUP_TABLE line
                let components = match tokens.peek() {
                    Some(("LOOKUP_TABLE", _)) => {
                        tokens.advance();
                        let _table_name = tokens.next_token()?;
                        1
                    }
                    Some((tok, _)) if matches!(tok.parse::<usize>(), Ok(1..=4)) => {
                        let components: usize = tokens.parse_next()?;
                        if let Some(("LOOKUP_TABLE", _)) = tokens.peek() {
                            tokens.advance();
                            let _table_name = tokens.next_token()?;
                        }
                        components
                    }
                    _ => 1,
                };
                let array = read_array(&mut tokens, name, components, tuples)?;
                push_array(&mut grid, is_point, array);
            }
            "VECTORS" => {
                let (is_point, tuples) = expect_section(section, line)?;
                let (name, _) = tokens.next_token()?;
                let name = name.to_string();
                let _dtype = tokens.next_token()?;
                let array = read_array(&mut tokens, name, 3, tuples)?;
                push_array(&mut grid, is_point, array);
            }
            "FIELD" => {
                let (is_point, _) = expect_section(section, line)?;
                let _field_name = tokens.next_token()?;
                let array_count: usize = tokens.parse_next()?;
                for _ in 0..array_count {
                    let (name, _) = tokens.next_token()?;
                    let name = name.to_string();
                    let components: usize = tokens.parse_next()?;
                    let tuples: usize = tokens.parse_next()?;
                    let _dtype = tokens.next_token()?;
                    let array = read_array(&mut tokens, name, components, tuples)?;
                    push_array(&mut grid, is_point, array);
                }
            }
            other => {
                return Err(DatasetError::parse(
                    line,
                    format!("unsupported attribute '{}'", other),
                ));
            }
        }
    }

    Ok(grid)
}

fn expect_section(section: Option<(bool, usize)>, line: usize) -> Result<(bool, usize), DatasetError> {
    section.ok_or_else(|| {
        DatasetError::parse(line, "attribute outside POINT_DATA/CELL_DATA section")
    })
}

fn read_array(
    tokens: &mut Tokens<'_>,
    name: String,
    components: usize,
    tuples: usize,
) -> Result<DataArray, DatasetError> {
    let mut values = Vec::with_capacity(components * tuples);
    for _ in 0..components * tuples {
        values.push(tokens.parse_next()?);
    }
    Ok(DataArray {
        name,
        components,
        values,
    })
}

fn push_array(grid: &mut UnstructuredGrid, is_point: bool, array: DataArray) {
    if is_point {
        grid.point_arrays.push(array);
    } else {
        grid.cell_arrays.push(array);
    }
}

/// Whitespace token stream with 1-based line tracking.
///
/// Legacy VTK allows values to wrap lines arbitrarily, so everything after
/// the fixed header is tokenized flat.
struct Tokens<'a> {
    tokens: Vec<(&'a str, usize)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(lines: impl Iterator<Item = (usize, &'a str)>) -> Self {
        let mut tokens = Vec::new();
        for (idx, line) in lines {
            for token in line.split_whitespace() {
                tokens.push((token, idx + 1));
            }
        }
        Tokens { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<(&'a str, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|&(_, line)| line)
            .unwrap_or(0)
    }

    fn next_token(&mut self) -> Result<(&'a str, usize), DatasetError> {
        let token = self
            .peek()
            .ok_or_else(|| DatasetError::parse(self.current_line(), "unexpected end of file"))?;
        self.advance();
        Ok(token)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), DatasetError> {
        let (token, line) = self.next_token()?;
        if token != keyword {
            return Err(DatasetError::parse(
                line,
                format!("expected '{}', found '{}'", keyword, token),
            ));
        }
        Ok(())
    }

    fn parse_next<T: std::str::FromStr>(&mut self) -> Result<T, DatasetError> {
        let (token, line) = self.next_token()?;
        token
            .parse()
            .map_err(|_| DatasetError::parse(line, format!("invalid number '{}'", token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FieldAssociation;

    const FIXTURE: &str = "\
# vtk DataFile Version 3.0
consolidation step 8
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 double
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
CELLS 1 5
4 0 1 2 3
CELL_TYPES 1
10
POINT_DATA 4
SCALARS Pressure double
LOOKUP_TABLE default
0.0 25.0 75.0 100.0
VECTORS Displacement double
0.0 0.0 0.1
0.0 0.0 0.2
0.0 0.0 0.3
0.0 0.0 0.4
CELL_DATA 1
SCALARS Stress double
LOOKUP_TABLE default
-50.0
";

    #[test]
    fn test_parse_fixture() {
        let grid = parse_legacy_vtk(FIXTURE).unwrap();
        assert_eq!(grid.points.len(), 4);
        assert_eq!(grid.points[3], DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(grid.cells, vec![vec![0, 1, 2, 3]]);
        assert_eq!(grid.point_arrays.len(), 2);
        assert_eq!(grid.cell_arrays.len(), 1);

        let pressure = grid.point_array("Pressure").unwrap();
        assert_eq!(pressure.components, 1);
        assert_eq!(pressure.range(), (0.0, 100.0));

        let displacement = grid.point_array("Displacement").unwrap();
        assert_eq!(displacement.components, 3);
        assert_eq!(displacement.num_tuples(), 4);
    }

    #[test]
    fn test_catalog_matches_fixture() {
        let grid = parse_legacy_vtk(FIXTURE).unwrap();
        let catalog = grid.field_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].name, "Pressure");
        assert_eq!(catalog[0].association, FieldAssociation::Point);
        assert_eq!(catalog[2].name, "Stress");
        assert_eq!(catalog[2].association, FieldAssociation::Cell);
        assert_eq!(catalog[2].range, (-50.0, -50.0));
    }

    #[test]
    fn test_field_arrays() {
        let text = "\
# vtk DataFile Version 3.0
field data
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 2 double
0 0 0
1 1 1
POINT_DATA 2
FIELD FieldData 2
Saturation 1 2 double
0.25 0.75
Flow 3 2 double
1 0 0
0 1 0
";
        let grid = parse_legacy_vtk(text).unwrap();
        assert_eq!(grid.point_arrays.len(), 2);
        assert_eq!(grid.point_array("Saturation").unwrap().range(), (0.25, 0.75));
        assert_eq!(grid.point_array("Flow").unwrap().components, 3);
    }

    #[test]
    fn test_rejects_binary() {
        let text = "# vtk DataFile Version 3.0\ntitle\nBINARY\nDATASET UNSTRUCTURED_GRID\n";
        let err = parse_legacy_vtk(text).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_rejects_other_dataset_kinds() {
        let text = "# vtk DataFile Version 3.0\ntitle\nASCII\nDATASET POLYDATA\n";
        let err = parse_legacy_vtk(text).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedDataset(kind) if kind == "POLYDATA"));
    }

    #[test]
    fn test_reports_bad_cell_index() {
        let text = "\
# vtk DataFile Version 3.0
bad cell
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 2 double
0 0 0
1 1 1
CELLS 1 3
2 0 7
";
        let err = parse_legacy_vtk(text).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn test_scalars_with_component_count() {
        let text = "\
# vtk DataFile Version 3.0
components
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 2 double
0 0 0
1 1 1
POINT_DATA 2
SCALARS Strain double 2
LOOKUP_TABLE default
0.0 1.0
2.0 3.0
";
        let grid = parse_legacy_vtk(text).unwrap();
        let strain = grid.point_array("Strain").unwrap();
        assert_eq!(strain.components, 2);
        assert_eq!(strain.range(), (0.0, 2.0));
    }
}
