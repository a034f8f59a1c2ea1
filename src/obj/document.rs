//! OBJ reader: objects, faces and the shared vertex pools.

use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector3};

use super::drawing_info::DrawingInfo;
use super::material::{Color, MaterialDocument};
use super::string_parser::StringParser;
use super::ObjError;

/// Options applied while reading an OBJ file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjLoadOptions {
    /// Multiplies every `v` and `vt` component
    pub scale: f32,
    /// Negates computed face normals
    pub reverse: bool,
}

impl Default for ObjLoadOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            reverse: false,
        }
    }
}

/// A triangulated face. All per-corner arrays have the same length, a
/// multiple of three.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub material_name: String,
    /// Zero-based positions into [`ObjDocument::vertices`]
    pub vertex_indices: Vec<usize>,
    /// Zero-based positions into [`ObjDocument::normals`], `None` when the
    /// corner had no `/vn` part
    pub normal_indices: Vec<Option<usize>>,
    pub tex_indices: Vec<Option<usize>>,
    /// Fallback normal for corners without their own
    pub normal: [f32; 3],
}

impl Face {
    pub fn corner_count(&self) -> usize {
        self.vertex_indices.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjObject {
    pub name: String,
    pub faces: Vec<Face>,
}

impl ObjObject {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            faces: Vec::new(),
        }
    }
}

/// A parsed OBJ file
#[derive(Debug, Clone, PartialEq)]
pub struct ObjDocument {
    pub file_name: Option<PathBuf>,
    /// Every `mtllib` path, resolved against the OBJ's directory
    pub material_libraries: Vec<PathBuf>,
    /// Material files loaded so far, in `mtllib` order once complete
    pub mtls: Vec<MaterialDocument>,
    pub objects: Vec<ObjObject>,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_vertices: Vec<[f32; 2]>,
}

impl ObjDocument {
    /// Parses OBJ text.
    ///
    /// `file_name` is only used to resolve `mtllib` paths. Unknown commands
    /// are skipped.
    pub fn parse(
        text: &str,
        options: ObjLoadOptions,
        file_name: Option<&Path>,
    ) -> Result<Self, ObjError> {
        let base_dir = file_name.and_then(Path::parent);
        let mut doc = Self {
            file_name: file_name.map(Path::to_path_buf),
            material_libraries: Vec::new(),
            mtls: Vec::new(),
            objects: Vec::new(),
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_vertices: Vec::new(),
        };
        let mut current_material = String::new();

        for (line_index, line) in text.lines().enumerate() {
            let mut sp = StringParser::new(line, line_index + 1);
            let Some(command) = sp.get_word() else {
                continue;
            };

            match command {
                "#" => {}
                "mtllib" => {
                    let word = sp.get_word().ok_or(ObjError::MissingValue {
                        line: sp.line(),
                        command: "mtllib",
                    })?;
                    let path = match base_dir {
                        Some(dir) => dir.join(word),
                        None => PathBuf::from(word),
                    };
                    doc.material_libraries.push(path);
                }
                "o" | "g" => {
                    let name = sp.get_word().unwrap_or("");
                    doc.objects.push(ObjObject::new(name));
                }
                "v" => {
                    let x = sp.get_float("v")? * options.scale;
                    let y = sp.get_float("v")? * options.scale;
                    let z = sp.get_float("v")? * options.scale;
                    doc.vertices.push([x, y, z]);
                }
                "vt" => {
                    let u = sp.get_float("vt")? * options.scale;
                    // v is optional in the OBJ format
                    let v = sp.get_optional_float("vt")?.unwrap_or(0.0) * options.scale;
                    doc.tex_vertices.push([u, v]);
                }
                "vn" => {
                    let x = sp.get_float("vn")?;
                    let y = sp.get_float("vn")?;
                    let z = sp.get_float("vn")?;
                    doc.normals.push([x, y, z]);
                }
                "usemtl" => {
                    current_material = sp.get_word().unwrap_or("").to_string();
                }
                "f" => {
                    let face = parse_face(&mut sp, &current_material, &doc.vertices, options)?;
                    if doc.objects.is_empty() {
                        doc.objects.push(ObjObject::new(""));
                    }
                    if let Some(object) = doc.objects.last_mut() {
                        object.faces.push(face);
                    }
                }
                _ => {}
            }
        }

        Ok(doc)
    }

    /// Adds a loaded material file.
    pub fn attach_material(&mut self, mtl: MaterialDocument) {
        self.mtls.push(mtl);
    }

    /// Material files still outstanding.
    pub fn pending_material_count(&self) -> usize {
        let done = self.mtls.iter().filter(|m| m.complete).count();
        self.material_libraries.len().saturating_sub(done)
    }

    pub fn is_mtl_complete(&self) -> bool {
        self.pending_material_count() == 0
    }

    /// First material with this name across all loaded files, or the default
    /// grey.
    pub fn find_color(&self, name: &str) -> Color {
        self.mtls
            .iter()
            .find_map(|mtl| mtl.find(name))
            .map_or(Color::DEFAULT, |m| m.color)
    }

    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }

    pub fn drawing_info(&self) -> Result<DrawingInfo, ObjError> {
        DrawingInfo::from_document(self)
    }
}

struct Corner {
    vertex: usize,
    tex: Option<usize>,
    normal: Option<usize>,
}

fn parse_index(part: &str, line: usize) -> Result<usize, ObjError> {
    match part.parse::<i64>() {
        Ok(index) if index >= 1 => Ok(index as usize - 1),
        _ => Err(ObjError::InvalidIndex {
            line,
            found: part.to_string(),
        }),
    }
}

fn parse_optional_index(part: Option<&str>, line: usize) -> Result<Option<usize>, ObjError> {
    match part {
        Some(p) if !p.is_empty() => parse_index(p, line).map(Some),
        _ => Ok(None),
    }
}

fn parse_corner(word: &str, line: usize) -> Result<Corner, ObjError> {
    let mut parts = word.split('/');
    let vertex = parse_index(parts.next().unwrap_or(""), line)?;
    let tex = parse_optional_index(parts.next(), line)?;
    let normal = parse_optional_index(parts.next(), line)?;
    Ok(Corner {
        vertex,
        tex,
        normal,
    })
}

fn parse_face(
    sp: &mut StringParser<'_>,
    material_name: &str,
    vertices: &[[f32; 3]],
    options: ObjLoadOptions,
) -> Result<Face, ObjError> {
    let line = sp.line();
    let mut corners = Vec::new();
    while let Some(word) = sp.get_word() {
        let corner = parse_corner(word, line)?;
        if corner.vertex >= vertices.len() {
            return Err(ObjError::VertexOutOfRange {
                line,
                index: corner.vertex + 1,
                available: vertices.len(),
            });
        }
        corners.push(corner);
    }
    if corners.len() < 3 {
        return Err(ObjError::DegenerateFace {
            line,
            count: corners.len(),
        });
    }

    let point = |i: usize| Vector3::from(vertices[corners[i].vertex]);
    let mut normal = calc_normal(point(0), point(1), point(2))
        .or_else(|| {
            (corners.len() >= 4)
                .then(|| calc_normal(point(1), point(2), point(3)))
                .flatten()
        })
        .unwrap_or(Vector3::unit_y());
    if options.reverse {
        normal = -normal;
    }

    let vertex_indices: Vec<usize> = corners.iter().map(|c| c.vertex).collect();
    let tex_indices: Vec<Option<usize>> = corners.iter().map(|c| c.tex).collect();
    let normal_indices: Vec<Option<usize>> = corners.iter().map(|c| c.normal).collect();

    Ok(Face {
        material_name: material_name.to_string(),
        vertex_indices: fan_triangulate(&vertex_indices),
        normal_indices: fan_triangulate(&normal_indices),
        tex_indices: fan_triangulate(&tex_indices),
        normal: normal.into(),
    })
}

/// Unit normal of the plane through three points, `None` when they are
/// collinear.
pub fn calc_normal(p0: Vector3<f32>, p1: Vector3<f32>, p2: Vector3<f32>) -> Option<Vector3<f32>> {
    let cross = (p0 - p1).cross(p2 - p1);
    let length = cross.magnitude();
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some(cross / length)
}

/// Splits a polygon into triangles `(0, i + 1, i + 2)`.
pub fn fan_triangulate<T: Copy>(corners: &[T]) -> Vec<T> {
    if corners.len() <= 3 {
        return corners.to_vec();
    }
    (0..corners.len() - 2)
        .flat_map(|i| [corners[0], corners[i + 1], corners[i + 2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    fn parse(text: &str) -> ObjDocument {
        ObjDocument::parse(text, ObjLoadOptions::default(), None).unwrap()
    }

    #[test]
    fn faces_before_any_object_get_an_unnamed_one() {
        let doc = parse(&format!("{TRIANGLE}f 1 2 3\no named\nf 3 2 1\n"));
        assert_eq!(doc.objects.len(), 2);
        assert_eq!(doc.objects[0].name, "");
        assert_eq!(doc.objects[0].faces.len(), 1);
        assert_eq!(doc.objects[1].name, "named");
        assert_eq!(doc.face_count(), 2);
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3 4//1\n");
        let face = &doc.objects[0].faces[0];
        assert_eq!(face.vertex_indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(
            face.normal_indices,
            vec![Some(0), Some(0), None, Some(0), None, Some(0)]
        );
        assert_eq!(face.corner_count(), 6);
    }

    #[test]
    fn pentagon_yields_three_triangles() {
        assert_eq!(
            fan_triangulate(&[10, 11, 12, 13, 14]),
            vec![10, 11, 12, 10, 12, 13, 10, 13, 14]
        );
    }

    #[test]
    fn face_normal_uses_edges_around_second_vertex() {
        let doc = parse(&format!("{TRIANGLE}f 1 2 3\n"));
        assert_eq!(doc.objects[0].faces[0].normal, [0.0, 0.0, -1.0]);

        let reversed = ObjDocument::parse(
            &format!("{TRIANGLE}f 1 2 3\n"),
            ObjLoadOptions {
                scale: 1.0,
                reverse: true,
            },
            None,
        )
        .unwrap();
        assert_eq!(reversed.objects[0].faces[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn collinear_start_falls_back_to_next_corners() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 2 0 0\nv 2 1 0\nf 1 2 3 4\n");
        assert_eq!(doc.objects[0].faces[0].normal, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn fully_degenerate_face_points_up() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\n");
        assert_eq!(doc.objects[0].faces[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn scale_applies_to_positions_and_uvs_only() {
        let doc = ObjDocument::parse(
            "v 1 2 3\nvt 0.5 0.25\nvn 0 1 0\n",
            ObjLoadOptions {
                scale: 2.0,
                reverse: false,
            },
            None,
        )
        .unwrap();
        assert_eq!(doc.vertices, vec![[2.0, 4.0, 6.0]]);
        assert_eq!(doc.tex_vertices, vec![[1.0, 0.5]]);
        assert_eq!(doc.normals, vec![[0.0, 1.0, 0.0]]);
    }

    #[test]
    fn usemtl_tags_following_faces() {
        let doc = parse(&format!("{TRIANGLE}f 1 2 3\nusemtl Red\nf 1 2 3\n"));
        let faces = &doc.objects[0].faces;
        assert_eq!(faces[0].material_name, "");
        assert_eq!(faces[1].material_name, "Red");
    }

    #[test]
    fn mtllib_resolves_next_to_the_obj() {
        let doc = ObjDocument::parse(
            "mtllib room.mtl\n",
            ObjLoadOptions::default(),
            Some(Path::new("assets/models/room.obj")),
        )
        .unwrap();
        assert_eq!(
            doc.material_libraries,
            vec![PathBuf::from("assets/models/room.mtl")]
        );
        assert_eq!(doc.pending_material_count(), 1);
        assert!(!doc.is_mtl_complete());
    }

    #[test]
    fn first_matching_material_wins() {
        let mut doc = parse("mtllib a.mtl\nmtllib b.mtl\n");
        let a = MaterialDocument::parse("newmtl Red\nKd 1 0 0\n", Path::new("a.mtl")).unwrap();
        let b = MaterialDocument::parse("newmtl Red\nKd 0.5 0 0\nnewmtl Green\nKd 0 1 0\n", Path::new("b.mtl"))
            .unwrap();
        doc.attach_material(a);
        doc.attach_material(b);
        assert!(doc.is_mtl_complete());
        assert_eq!(doc.find_color("Red"), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(doc.find_color("Green"), Color::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(doc.find_color("Blue"), Color::DEFAULT);
    }

    #[test]
    fn malformed_faces_are_rejected() {
        let opts = ObjLoadOptions::default();
        assert!(matches!(
            ObjDocument::parse(&format!("{TRIANGLE}f 1 2\n"), opts, None),
            Err(ObjError::DegenerateFace { line: 4, count: 2 })
        ));
        assert!(matches!(
            ObjDocument::parse(&format!("{TRIANGLE}f 1 2 9\n"), opts, None),
            Err(ObjError::VertexOutOfRange { index: 9, available: 3, .. })
        ));
        assert!(matches!(
            ObjDocument::parse(&format!("{TRIANGLE}f 0 1 2\n"), opts, None),
            Err(ObjError::InvalidIndex { .. })
        ));
        assert!(matches!(
            ObjDocument::parse("v 1 nope 3\n", opts, None),
            Err(ObjError::InvalidNumber { line: 1, .. })
        ));
    }

    #[test]
    fn quoted_and_spaced_material_names_match_usemtl() {
        let mut doc = parse(&format!(
            "{TRIANGLE}usemtl \"Red\"\nf 1 2 3\nusemtl Dark Red\nf 1 2 3\n"
        ));
        let mtl = MaterialDocument::parse(
            "newmtl \"Red\"\nKd 1 0 0\nnewmtl Dark Red\nKd 0.5 0 0\n",
            Path::new("a.mtl"),
        )
        .unwrap();
        doc.attach_material(mtl);

        let faces = &doc.objects[0].faces;
        assert_eq!(doc.find_color(&faces[0].material_name), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(doc.find_color(&faces[1].material_name), Color::new(0.5, 0.0, 0.0, 1.0));

        let info = doc.drawing_info().unwrap();
        assert_eq!(info.colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(info.colors[3], [0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn vt_without_v_defaults_to_zero() {
        let doc = parse("vt 0.75\nvt 0.5 0.25\n");
        assert_eq!(doc.tex_vertices, vec![[0.75, 0.0], [0.5, 0.25]]);
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let doc = parse(&format!("s off\nl 1 2\n{TRIANGLE}f 1 2 3\n"));
        assert_eq!(doc.vertices.len(), 3);
        assert_eq!(doc.face_count(), 1);
    }
}
