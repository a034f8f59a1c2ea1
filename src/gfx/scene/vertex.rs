//! # Vertex Buffer Layouts
//!
//! The renderer keeps every vertex attribute in its own buffer instead of an
//! interleaved struct. This module describes those buffers to wgpu.
//!
//! | Slot | Location | Textured pipeline | Vertex-colour pipeline |
//! |------|----------|-------------------|------------------------|
//! | 0    | 0        | position `Float32x3` | position `Float32x3` |
//! | 1    | 1        | normal `Float32x3`   | normal `Float32x3`   |
//! | 2    | 2        | uv `Float32x2`       | colour `Float32x4`   |

use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode};

const POSITION_ATTRIBUTES: [VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const TEX_COORD_ATTRIBUTES: [VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];
const COLOR_ATTRIBUTES: [VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x4];

fn layout(components: usize, attributes: &'static [VertexAttribute]) -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: (components * std::mem::size_of::<f32>()) as BufferAddress,
        step_mode: VertexStepMode::Vertex,
        attributes,
    }
}

/// Which set of vertex attributes a pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// position + normal + texture coordinate (procedural primitives)
    Textured,
    /// position + normal + RGBA colour (OBJ meshes)
    VertexColor,
}

impl VertexKind {
    /// Returns the three vertex buffer layouts, one per slot.
    pub fn layouts(self) -> [VertexBufferLayout<'static>; 3] {
        let third = match self {
            VertexKind::Textured => layout(2, &TEX_COORD_ATTRIBUTES),
            VertexKind::VertexColor => layout(4, &COLOR_ATTRIBUTES),
        };
        [
            layout(3, &POSITION_ATTRIBUTES),
            layout(3, &NORMAL_ATTRIBUTES),
            third,
        ]
    }
}
