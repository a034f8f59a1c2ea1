//! GPU copies of drawable geometry
//!
//! Every attribute lives in its own vertex buffer, laid out as described by
//! [`VertexKind::layouts`]. Indices are always uploaded as `u16`.

use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;
use crate::gfx::scene::VertexKind;
use crate::obj::DrawingInfo;

pub struct GeometryBuffers {
    pub kind: VertexKind,
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    /// Texture coordinates or colours, depending on `kind`
    attributes: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

fn vertex_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Index data padded to the 4-byte multiple `write_buffer` and mapped
/// creation require.
fn index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice::<u16, u8>(indices).to_vec();
    bytes.resize(bytes.len().next_multiple_of(4), 0);
    bytes
}

impl GeometryBuffers {
    fn create(
        device: &wgpu::Device,
        label: &str,
        kind: VertexKind,
        positions: &[u8],
        normals: &[u8],
        attributes: &[u8],
        indices: &[u16],
    ) -> Self {
        let indices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: &index_bytes(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            kind,
            positions: vertex_buffer(device, &format!("{label} Positions"), positions),
            normals: vertex_buffer(device, &format!("{label} Normals"), normals),
            attributes: vertex_buffer(device, &format!("{label} Attributes"), attributes),
            indices: indices_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Uploads a procedural primitive (cube or cylinder).
    pub fn from_primitive(device: &wgpu::Device, label: &str, data: &GeometryData) -> Self {
        Self::create(
            device,
            label,
            VertexKind::Textured,
            bytemuck::cast_slice(&data.positions),
            bytemuck::cast_slice(&data.normals),
            bytemuck::cast_slice(&data.tex_coords),
            &data.indices_u16(),
        )
    }

    /// Uploads an OBJ mesh with per-vertex colours.
    pub fn from_drawing_info(device: &wgpu::Device, label: &str, info: &DrawingInfo) -> Self {
        Self::create(
            device,
            label,
            VertexKind::VertexColor,
            bytemuck::cast_slice(&info.vertices),
            bytemuck::cast_slice(&info.normals),
            bytemuck::cast_slice(&info.colors),
            &info.indices,
        )
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

pub trait DrawGeometry {
    fn draw_geometry(&mut self, geometry: &GeometryBuffers);
}

impl DrawGeometry for wgpu::RenderPass<'_> {
    fn draw_geometry(&mut self, geometry: &GeometryBuffers) {
        if geometry.index_count == 0 {
            return;
        }
        self.set_vertex_buffer(0, geometry.positions.slice(..));
        self.set_vertex_buffer(1, geometry.normals.slice(..));
        self.set_vertex_buffer(2, geometry.attributes.slice(..));
        self.set_index_buffer(geometry.indices.slice(..), wgpu::IndexFormat::Uint16);
        self.draw_indexed(0..geometry.index_count, 0, 0..1);
    }
}
