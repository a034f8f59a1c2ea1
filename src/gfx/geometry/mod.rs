//! # Procedural Geometry Generation
//!
//! Builds the two primitive shapes the living room is assembled from, so that
//! no model files are needed for the furniture.
//!
//! ## Supported Primitives
//!
//! - **Cube**: 24-vertex cube with extent ±1 and per-face UVs
//! - **Cylinder**: sliced cylinder with caps, at most 256 vertices
//!
//! ## Usage
//!
//! ```rust
//! use living_room::gfx::geometry::{generate_cube, generate_cylinder};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.index_count(), 36);
//!
//! let cylinder = generate_cylinder(0.5, 0.5, 20).unwrap();
//! assert_eq!(cylinder.vertex_count(), 200);
//! ```

pub mod primitives;

pub use primitives::*;

/// Largest vertex count addressable by an 8-bit index buffer.
pub const MAX_U8_VERTICES: usize = u8::MAX as usize + 1;

/// Errors produced by the primitive builders
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("A cylinder needs at least 3 slices, got {0}")]
    TooFewSlices(u32),
    #[error("{0} vertices do not fit an 8-bit index buffer (max {MAX_U8_VERTICES})")]
    IndexOverflow(usize),
}

/// Static geometry data ready for GPU upload
///
/// Attributes are kept as separate arrays, matching the non-interleaved
/// vertex buffer layout of the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices, 8-bit by format
    pub indices: Vec<u8>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Element count for the draw call
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Indices widened to 16 bits.
    ///
    /// wgpu has no 8-bit index format, so this is what gets uploaded.
    pub fn indices_u16(&self) -> Vec<u16> {
        self.indices.iter().map(|&i| u16::from(i)).collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
