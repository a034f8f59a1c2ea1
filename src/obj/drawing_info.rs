//! Flattening of an [`ObjDocument`] into per-corner vertex arrays.

use super::document::ObjDocument;
use super::ObjError;

/// Attribute arrays with one entry per triangle corner
///
/// Vertex sharing is discarded: `indices` is always `0..N`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingInfo {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u16>,
}

impl DrawingInfo {
    pub fn from_document(doc: &ObjDocument) -> Result<Self, ObjError> {
        let corner_count: usize = doc
            .objects
            .iter()
            .flat_map(|o| &o.faces)
            .map(|f| f.corner_count())
            .sum();
        if corner_count > usize::from(u16::MAX) + 1 {
            return Err(ObjError::TooManyCorners(corner_count));
        }

        let mut info = Self {
            vertices: Vec::with_capacity(corner_count),
            normals: Vec::with_capacity(corner_count),
            colors: Vec::with_capacity(corner_count),
            indices: Vec::with_capacity(corner_count),
        };

        for face in doc.objects.iter().flat_map(|o| &o.faces) {
            let color = doc.find_color(&face.material_name).to_array();
            for (&v_idx, &n_idx) in face.vertex_indices.iter().zip(&face.normal_indices) {
                // Vertex indices were range-checked during parsing
                info.vertices.push(doc.vertices[v_idx]);
                info.colors.push(color);
                let normal = match n_idx {
                    Some(n) => *doc.normals.get(n).ok_or(ObjError::NormalOutOfRange {
                        index: n + 1,
                        available: doc.normals.len(),
                    })?,
                    None => face.normal,
                };
                info.normals.push(normal);
                info.indices.push(info.indices.len() as u16);
            }
        }

        Ok(info)
    }

    pub fn corner_count(&self) -> usize {
        self.indices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::obj::{Color, MaterialDocument, ObjLoadOptions};

    fn parse(text: &str) -> ObjDocument {
        ObjDocument::parse(text, ObjLoadOptions::default(), None).unwrap()
    }

    #[test]
    fn shared_vertices_are_expanded_per_corner() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let info = doc.drawing_info().unwrap();
        assert_eq!(info.corner_count(), 6);
        assert_eq!(info.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(info.vertices[3], [0.0, 0.0, 0.0]);
        assert_eq!(info.vertices[5], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn obj_normals_override_face_normal() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0.6 0.8 0\nf 1//1 2 3\n");
        let info = doc.drawing_info().unwrap();
        assert_eq!(info.normals[0], [0.6, 0.8, 0.0]);
        assert_eq!(info.normals[1], [0.0, 0.0, -1.0]);
        assert_eq!(info.normals[2], [0.0, 0.0, -1.0]);
    }

    #[test]
    fn colors_resolve_through_materials() {
        let mut doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Red\nf 1 2 3\nusemtl Nope\nf 1 2 3\n");
        doc.attach_material(
            MaterialDocument::parse("newmtl Red\nKd 1 0 0\n", Path::new("r.mtl")).unwrap(),
        );
        let info = doc.drawing_info().unwrap();
        assert_eq!(info.colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(info.colors[3], Color::DEFAULT.to_array());
    }

    #[test]
    fn dangling_normal_reference_is_an_error() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//4 2 3\n");
        assert!(matches!(
            doc.drawing_info(),
            Err(ObjError::NormalOutOfRange { index: 4, available: 0 })
        ));
    }

    #[test]
    fn empty_document_has_nothing_to_draw() {
        let info = parse("# nothing\n").drawing_info().unwrap();
        assert!(info.is_empty());
        assert_eq!(info.index_count(), 0);
    }
}
