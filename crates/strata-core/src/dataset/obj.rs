//! Wavefront OBJ reader for the surveyed site model
//!
//! Handles the records the photogrammetry exports contain: `v`, `vt`, and
//! `f` with fan triangulation of larger polygons. Normals, groups, and
//! material statements are ignored. The companion texture image is read as
//! opaque bytes; decoding is left to the presentation layer.

use std::path::{Path, PathBuf};

use glam::DVec3;

use super::DatasetError;

/// One corner of a triangulated face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
}

/// Triangulated OBJ surface
#[derive(Debug, Clone, Default)]
pub struct SurfaceModel {
    pub positions: Vec<DVec3>,
    pub texcoords: Vec<[f64; 2]>,
    pub triangles: Vec<[FaceVertex; 3]>,
}

impl SurfaceModel {
    pub fn bounds(&self) -> Option<crate::types::Bounds> {
        crate::types::Bounds::from_points(self.positions.iter().copied())
    }
}

/// Texture image, read once at startup and handed to the renderer opaque
#[derive(Debug, Clone)]
pub struct Texture {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Read and parse a surface model from a file path
pub fn read_obj(path: &Path) -> Result<SurfaceModel, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&text)
}

/// Read a texture image file as raw bytes
pub fn read_texture(path: &Path) -> Result<Texture, DatasetError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Texture {
        path: path.to_path_buf(),
        bytes,
    })
}

/// Parse a surface model from OBJ file contents
pub fn parse_obj(text: &str) -> Result<SurfaceModel, DatasetError> {
    let mut model = SurfaceModel::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(record) = parts.next() else {
            continue;
        };
        match record {
            "v" => {
                let x = parse_coord(parts.next(), line_no)?;
                let y = parse_coord(parts.next(), line_no)?;
                let z = parse_coord(parts.next(), line_no)?;
                model.positions.push(DVec3::new(x, y, z));
            }
            "vt" => {
                let u = parse_coord(parts.next(), line_no)?;
                let v = parse_coord(parts.next(), line_no)?;
                model.texcoords.push([u, v]);
            }
            "f" => {
                let mut corners = Vec::new();
                for part in parts {
                    corners.push(parse_face_vertex(part, &model, line_no)?);
                }
                if corners.len() < 3 {
                    return Err(DatasetError::parse(
                        line_no,
                        format!("face with {} vertices", corners.len()),
                    ));
                }
                // Fan triangulation around the first corner
                for i in 1..corners.len() - 1 {
                    model
                        .triangles
                        .push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            // vn, g, o, s, usemtl, mtllib and friends carry no geometry
            _ => {}
        }
    }

    Ok(model)
}

fn parse_coord(token: Option<&str>, line: usize) -> Result<f64, DatasetError> {
    let token = token.ok_or_else(|| DatasetError::parse(line, "missing coordinate"))?;
    token
        .parse()
        .map_err(|_| DatasetError::parse(line, format!("invalid coordinate '{}'", token)))
}

fn parse_face_vertex(
    token: &str,
    model: &SurfaceModel,
    line: usize,
) -> Result<FaceVertex, DatasetError> {
    let mut fields = token.split('/');
    let position = resolve_index(fields.next(), model.positions.len(), line)?
        .ok_or_else(|| DatasetError::parse(line, format!("face vertex '{}' has no position", token)))?;
    let texcoord = resolve_index(fields.next(), model.texcoords.len(), line)?;
    Ok(FaceVertex { position, texcoord })
}

/// Resolve a 1-based (or negative, relative-to-end) OBJ index into a
/// 0-based one. An absent or empty field resolves to `None`.
fn resolve_index(
    field: Option<&str>,
    len: usize,
    line: usize,
) -> Result<Option<usize>, DatasetError> {
    let Some(field) = field else {
        return Ok(None);
    };
    if field.is_empty() {
        return Ok(None);
    }
    let value: i64 = field
        .parse()
        .map_err(|_| DatasetError::parse(line, format!("invalid index '{}'", field)))?;
    let resolved = if value > 0 {
        (value - 1) as usize
    } else if value < 0 {
        let offset = (-value) as usize;
        if offset > len {
            return Err(DatasetError::parse(line, format!("index {} out of range", value)));
        }
        len - offset
    } else {
        return Err(DatasetError::parse(line, "OBJ indices are 1-based, found 0"));
    };
    if resolved >= len {
        return Err(DatasetError::parse(line, format!("index {} out of range", value)));
    }
    Ok(Some(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triangle() {
        let model = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(model.positions.len(), 3);
        assert_eq!(model.triangles.len(), 1);
        assert_eq!(model.triangles[0][2].position, 2);
        assert_eq!(model.triangles[0][0].texcoord, None);
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles.len(), 2);
        let first: Vec<usize> = model.triangles[0].iter().map(|c| c.position).collect();
        let second: Vec<usize> = model.triangles[1].iter().map(|c| c.position).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![0, 2, 3]);
    }

    #[test]
    fn test_texcoords_and_slash_forms() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
f 1//1 2//2 3//3
";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles.len(), 2);
        assert_eq!(model.triangles[0][1].texcoord, Some(1));
        assert_eq!(model.triangles[1][1].texcoord, None);
    }

    #[test]
    fn test_negative_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let model = parse_obj(text).unwrap();
        let corners: Vec<usize> = model.triangles[0].iter().map(|c| c.position).collect();
        assert_eq!(corners, vec![0, 1, 2]);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_ignores_non_geometry_records() {
        let text = "mtllib site.mtl\no dam\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\ns off\nf 1 2 3\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles.len(), 1);
    }
}
