//! # Primitive Shape Generation
//!
//! This module contains functions to generate the cube and cylinder primitives.
//! All shapes are generated with outward normals and texture coordinates.

use super::{GeometryData, GeometryError, MAX_U8_VERTICES};
use std::f32::consts::TAU;

/// Slice count used for every cylinder in the room
pub const DEFAULT_CYLINDER_SLICES: u32 = 20;

/// Vertices emitted per cylinder slice: top cap (3), side quad (4), bottom cap (3)
pub const CYLINDER_VERTICES_PER_SLICE: usize = 10;

/// Indices emitted per cylinder slice: four triangles
pub const CYLINDER_INDICES_PER_SLICE: usize = 12;

/// Generate a cube centered at the origin
///
/// Returns a cube with vertices from -1.0 to 1.0 on all axes; the furniture
/// scales in the living room are calibrated against this extent.
/// Each face has its own four vertices with an axis-aligned normal and maps
/// the full [0, 1] texture square.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    #[rustfmt::skip]
    let positions = [
        // Front face (v0-v1-v2-v3)
        [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
        // Right face (v0-v3-v4-v5)
        [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0],
        // Top face (v0-v5-v6-v1)
        [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0],
        // Left face (v1-v6-v7-v2)
        [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0],
        // Bottom face (v7-v4-v3-v2)
        [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
        // Back face (v4-v7-v6-v5)
        [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0],
        [0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, -1.0],
    ];

    data.positions = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    // Two triangles per face, fanned from the face's first vertex
    data.indices = (0..6u8)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    data
}

/// Start and end angle (radians) of cylinder slice `i`.
///
/// The end angle of the last slice wraps to the start angle of slice 0 so the
/// side closes without a seam.
pub fn slice_angles(i: u32, slices: u32) -> (f32, f32) {
    let theta = i as f32 / slices as f32 * TAU;
    let next = (i + 1) % slices;
    let next_theta = next as f32 / slices as f32 * TAU;
    (theta, next_theta)
}

/// Generate a capped cylinder along the Y axis
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `half_length` - Half of the height; the cylinder spans -half_length..half_length in Y
/// * `slices` - Number of angular slices
///
/// Every slice emits a top-cap triangle, a side quad as two triangles and a
/// bottom-cap triangle, i.e. 10 vertices and 12 indices. Fails when the slice
/// count is below 3 or the vertices would overflow an 8-bit index buffer.
pub fn generate_cylinder(
    radius: f32,
    half_length: f32,
    slices: u32,
) -> Result<GeometryData, GeometryError> {
    if slices < 3 {
        return Err(GeometryError::TooFewSlices(slices));
    }
    let vertex_count = slices as usize * CYLINDER_VERTICES_PER_SLICE;
    if vertex_count > MAX_U8_VERTICES {
        return Err(GeometryError::IndexOverflow(vertex_count));
    }

    let mut data = GeometryData::new();
    let up = [0.0, 1.0, 0.0];
    let down = [0.0, -1.0, 0.0];
    let cap_uv = |angle: f32| [0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin()];

    for i in 0..slices {
        let (theta, next_theta) = slice_angles(i, slices);
        let (cos_a, sin_a) = (theta.cos(), theta.sin());
        let (cos_b, sin_b) = (next_theta.cos(), next_theta.sin());

        let top_a = [radius * cos_a, half_length, radius * sin_a];
        let top_b = [radius * cos_b, half_length, radius * sin_b];
        let bottom_a = [radius * cos_a, -half_length, radius * sin_a];
        let bottom_b = [radius * cos_b, -half_length, radius * sin_b];

        let u0 = i as f32 / slices as f32;
        let u1 = (i + 1) as f32 / slices as f32;

        // Slice of top cap
        data.positions.extend([[0.0, half_length, 0.0], top_a, top_b]);
        data.normals.extend([up; 3]);
        data.tex_coords
            .extend([[0.5, 0.5], cap_uv(theta), cap_uv(next_theta)]);

        // Side quad
        data.positions.extend([top_a, top_b, bottom_b, bottom_a]);
        data.normals.extend([
            [cos_a, 0.0, sin_a],
            [cos_b, 0.0, sin_b],
            [cos_b, 0.0, sin_b],
            [cos_a, 0.0, sin_a],
        ]);
        data.tex_coords
            .extend([[u0, 1.0], [u1, 1.0], [u1, 0.0], [u0, 0.0]]);

        // Slice of bottom cap
        data.positions.extend([bottom_a, bottom_b, [0.0, -half_length, 0.0]]);
        data.normals.extend([down; 3]);
        data.tex_coords
            .extend([cap_uv(theta), cap_uv(next_theta), [0.5, 0.5]]);

        let base = (i as usize * CYLINDER_VERTICES_PER_SLICE) as u8;
        data.indices.extend(
            [0, 1, 2, 3, 6, 4, 4, 6, 5, 7, 8, 9].map(|offset: u8| base + offset),
        );
    }

    Ok(data)
}

/// The cylinder every round piece of furniture is scaled from
pub fn unit_cylinder() -> Result<GeometryData, GeometryError> {
    generate_cylinder(0.5, 0.5, DEFAULT_CYLINDER_SLICES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_unit_axis(n: [f32; 3]) -> bool {
        let non_zero: Vec<f32> = n.iter().copied().filter(|c| *c != 0.0).collect();
        non_zero.len() == 1 && non_zero[0].abs() == 1.0
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.normals.len(), 24);
        assert_eq!(cube.tex_coords.len(), 24);
    }

    #[test]
    fn test_cube_normals_are_unit_axes_facing_outward() {
        let cube = generate_cube();
        for (position, normal) in cube.positions.iter().zip(&cube.normals) {
            assert!(is_unit_axis(*normal), "normal {normal:?} is not an axis");
            // The vertex sits on the face the normal points out of
            let axis = normal.iter().position(|c| *c != 0.0).unwrap();
            assert_eq!(position[axis], normal[axis]);
        }
    }

    #[test]
    fn test_cube_faces_cover_full_texture_square() {
        let cube = generate_cube();
        for face in cube.tex_coords.chunks(4) {
            let mut corners: Vec<[f32; 2]> = face.to_vec();
            corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(corners, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        }
    }

    #[test]
    fn test_cylinder_counts_scale_with_slices() {
        for slices in [3, 8, 20, 25] {
            let cylinder = generate_cylinder(0.5, 0.5, slices).unwrap();
            assert_eq!(cylinder.vertex_count(), 10 * slices as usize);
            assert_eq!(cylinder.indices.len(), 12 * slices as usize);
            assert_eq!(cylinder.normals.len(), cylinder.vertex_count());
            assert_eq!(cylinder.tex_coords.len(), cylinder.vertex_count());
            let max = *cylinder.indices.iter().max().unwrap() as usize;
            assert_eq!(max, cylinder.vertex_count() - 1);
        }
    }

    #[test]
    fn test_cylinder_last_slice_wraps_to_first() {
        let slices = DEFAULT_CYLINDER_SLICES;
        let (first, _) = slice_angles(0, slices);
        let (_, last_next) = slice_angles(slices - 1, slices);
        assert_eq!(first, last_next);

        // The closing side edge lands exactly on the first slice's rim vertex
        let cylinder = unit_cylinder().unwrap();
        let last = (slices as usize - 1) * CYLINDER_VERTICES_PER_SLICE;
        assert_eq!(cylinder.positions[last + 2], cylinder.positions[1]);
        assert_eq!(cylinder.positions[last + 4], cylinder.positions[3]);
    }

    #[test]
    fn test_cylinder_side_normals_are_radial() {
        let cylinder = generate_cylinder(0.5, 0.5, 12).unwrap();
        for slice in 0..12 {
            let base = slice * CYLINDER_VERTICES_PER_SLICE;
            for k in 3..7 {
                let p = cylinder.positions[base + k];
                let n = cylinder.normals[base + k];
                assert_eq!(n[1], 0.0);
                assert!((p[0] - 0.5 * n[0]).abs() < 1e-6);
                assert!((p[2] - 0.5 * n[2]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_cylinder_rejects_bad_slice_counts() {
        assert_eq!(
            generate_cylinder(0.5, 0.5, 2),
            Err(GeometryError::TooFewSlices(2))
        );
        assert_eq!(
            generate_cylinder(0.5, 0.5, 26),
            Err(GeometryError::IndexOverflow(260))
        );
    }

    #[test]
    fn test_indices_widen_without_change() {
        let cylinder = unit_cylinder().unwrap();
        let wide = cylinder.indices_u16();
        assert_eq!(wide.len(), cylinder.indices.len());
        assert!(wide.iter().zip(&cylinder.indices).all(|(w, n)| *w == u16::from(*n)));
    }
}
