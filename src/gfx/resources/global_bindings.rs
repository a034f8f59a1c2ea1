//! Global uniform bindings for lighting
//!
//! Holds the per-frame lighting values shared by every draw: one point light,
//! an ambient term and the fading light intensity. Bound to slot 0 in both
//! render pipelines.

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    light_color: [f32; 4],
    light_position: [f32; 4],
    ambient: [f32; 4],
    /// x: light intensity
    params: [f32; 4],
}
// Total: 4 * 16 = 64 bytes

impl GlobalUBOContent {
    pub fn new(light: &LightConfig, intensity: f32) -> Self {
        let [r, g, b] = light.color;
        let [x, y, z] = light.position;
        let [ar, ag, ab] = light.ambient;
        Self {
            light_color: [r, g, b, 1.0],
            light_position: [x, y, z, 1.0],
            ambient: [ar, ag, ab, 1.0],
            params: [intensity, 0.0, 0.0, 0.0],
        }
    }

    pub fn intensity(&self) -> f32 {
        self.params[0]
    }
}

/// Point light and ambient colour
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.8, 0.0],
            color: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Uploads this frame's lighting.
///
/// Written unconditionally every frame since the intensity is animated.
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, light: &LightConfig, intensity: f32) {
    ubo.force_update_content(queue, GlobalUBOContent::new(light, intensity));
}

/// Manages bind group layouts and bind groups for global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; the bind group is created by `create_bind_group`.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 64);
        let content = GlobalUBOContent::new(&LightConfig::default(), 0.3);
        assert_eq!(content.intensity(), 0.3);
        assert_eq!(content.light_position, [0.0, 2.8, 0.0, 1.0]);
        assert_eq!(content.ambient, [0.2, 0.2, 0.2, 1.0]);
    }
}
