// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

/// Uniform buffer holding a single `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
        }
    }

    /// Force update buffer content
    pub fn force_update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Rounds `size` up to the next multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Uniform buffer with one aligned slot per draw, bound with a dynamic
/// offset
///
/// The buffer grows (never shrinks) when a frame has more draws than slots.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<Content>() as u64, alignment);
        let capacity = capacity.max(1);
        DynamicUniformBuffer {
            buffer: Self::create_buffer(device, stride, capacity),
            content_type: PhantomData,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer<{}>", short_type_name::<Content>())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Makes room for `count` slots. Returns true when the buffer was
    /// replaced, in which case bind groups pointing at it must be rebuilt.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, count: usize) -> bool {
        if count <= self.capacity {
            return false;
        }
        let capacity = count.next_power_of_two();
        log::debug!(
            "Growing {} from {} to {capacity} slots",
            short_type_name::<Content>(),
            self.capacity
        );
        self.buffer = Self::create_buffer(device, self.stride, capacity);
        self.capacity = capacity;
        true
    }

    /// Writes `contents` into consecutive slots starting at slot 0.
    pub fn write_all(&mut self, queue: &wgpu::Queue, contents: &[Content]) {
        if contents.is_empty() {
            return;
        }
        pack_strided(&mut self.staging, contents, self.stride as usize);
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of slot `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// One element wide; the dynamic offset selects the slot
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }
}

/// Copies each element to the start of its `stride`-sized slot.
fn pack_strided<Content: bytemuck::Pod>(out: &mut Vec<u8>, contents: &[Content], stride: usize) {
    out.clear();
    out.resize(stride * contents.len(), 0);
    for (slot, content) in out.chunks_exact_mut(stride).zip(contents) {
        let bytes = bytemuck::bytes_of(content);
        slot[..bytes.len()].copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(208, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(64, 0), 64);
    }

    #[test]
    fn packing_places_each_element_at_its_slot() {
        let mut out = Vec::new();
        pack_strided(&mut out, &[[1u32, 2], [3, 4]], 16);
        assert_eq!(out.len(), 32);
        let words: Vec<u32> = out
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(words, vec![1, 2, 0, 0, 3, 4, 0, 0]);
    }
}
