//! WGPU-based rendering engine for the living room
//!
//! Owns the surface, device, pipelines and every GPU resource the room
//! needs: the two primitive meshes, the optional OBJ mesh, the texture set
//! and the per-draw uniform buffer.

use std::path::Path;
use std::sync::Arc;
use wgpu::TextureFormat;

use crate::gfx::{
    geometry::{generate_cube, unit_cylinder, GeometryError},
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
        texture_library::TextureLibrary,
        texture_resource::TextureResource,
    },
    scene::{DrawUniform, GeometryKind, VertexKind},
};
use crate::obj::DrawingInfo;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::DynamicUniformBuffer,
};

use super::draw_list::DrawList;
use super::geometry_buffers::{DrawGeometry, GeometryBuffers};
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const TEXTURED_PIPELINE: &str = "Textured";
const VERTEX_COLOR_PIPELINE: &str = "VertexColor";

/// Enough slots for the whole room plus the ornament.
const INITIAL_DRAW_CAPACITY: usize = 64;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Errors that stop the renderer from starting
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("Failed to request adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to request a device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface reports no supported formats on this adapter")]
    NoSurfaceFormat,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("Shader or pipeline creation failed: {0}")]
    Pipeline(String),
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    draw_uniforms: DynamicUniformBuffer<DrawUniform>,
    draw_layout: BindGroupLayoutWithDesc,
    draw_bind_group: wgpu::BindGroup,

    textures: TextureLibrary,
    cube: GeometryBuffers,
    cylinder: GeometryBuffers,
    mesh: Option<GeometryBuffers>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Loads every surface texture from `texture_dir`, uploads the cube and
    /// cylinder, and builds both pipelines. Shader or pipeline validation
    /// failures are returned instead of surfacing on the first frame.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `texture_dir` - Directory holding the room's images
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        texture_dir: &Path,
    ) -> Result<RenderEngine, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(InitError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // Animation advances once per frame, so stay on vsync
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let draw_uniforms = DynamicUniformBuffer::new(&device, INITIAL_DRAW_CAPACITY);
        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::dynamic_uniform(
                std::mem::size_of::<DrawUniform>() as u64,
            ))
            .create(&device, "Draw Bind Group Layout");
        let draw_bind_group = BindGroupBuilder::new(&draw_layout)
            .resource(draw_uniforms.binding_resource())
            .create(&device, "Draw Bind Group");

        let textures = TextureLibrary::load(&device, &queue, texture_dir);
        let cube = GeometryBuffers::from_primitive(&device, "Cube", &generate_cube());
        let cylinder = GeometryBuffers::from_primitive(&device, "Cylinder", &unit_cylinder()?);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        device_handle.push_error_scope(wgpu::ErrorFilter::Validation);

        pipeline_manager.load_shader("textured", include_str!("shaders/textured.wgsl"));
        pipeline_manager.load_shader("vertex_color", include_str!("shaders/vertex_color.wgsl"));

        pipeline_manager.register_pipeline(
            TEXTURED_PIPELINE,
            PipelineConfig::default()
                .with_label(TEXTURED_PIPELINE)
                .with_shader("textured")
                .with_vertex_kind(VertexKind::Textured)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    draw_layout.layout.clone(),
                    textures.bind_group_layout().clone(),
                ]),
        );
        pipeline_manager.register_pipeline(
            VERTEX_COLOR_PIPELINE,
            PipelineConfig::default()
                .with_label(VERTEX_COLOR_PIPELINE)
                .with_shader("vertex_color")
                .with_vertex_kind(VertexKind::VertexColor)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    draw_layout.layout.clone(),
                ]),
        );

        let created = pipeline_manager.create_all_pipelines();
        if let Some(error) = device_handle.pop_error_scope().await {
            return Err(InitError::Pipeline(error.to_string()));
        }
        created.map_err(|errors| InitError::Pipeline(errors.join("; ")))?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            draw_uniforms,
            draw_layout,
            draw_bind_group,
            textures,
            cube,
            cylinder,
            mesh: None,
        })
    }

    /// Replaces the ornament mesh.
    pub fn upload_mesh(&mut self, info: &DrawingInfo) {
        self.mesh = Some(GeometryBuffers::from_drawing_info(&self.device, "Mesh", info));
    }

    pub fn clear_mesh(&mut self) {
        self.mesh = None;
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    fn geometry(&self, kind: GeometryKind) -> Option<&GeometryBuffers> {
        match kind {
            GeometryKind::Cube => Some(&self.cube),
            GeometryKind::Cylinder => Some(&self.cylinder),
            GeometryKind::Mesh => self.mesh.as_ref(),
        }
    }

    /// Renders one frame of `draws`, lit by `light` at `intensity`
    ///
    /// Lost or outdated surfaces are returned to the caller, which should
    /// resize (reconfigure) and try again next frame.
    pub fn render_frame(
        &mut self,
        draws: &DrawList,
        light: &LightConfig,
        intensity: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        update_global_ubo(&mut self.global_ubo, &self.queue, light, intensity);

        if self.draw_uniforms.ensure_capacity(&self.device, draws.len()) {
            self.draw_bind_group = BindGroupBuilder::new(&self.draw_layout)
                .resource(self.draw_uniforms.binding_resource())
                .create(&self.device, "Draw Bind Group");
        }
        self.draw_uniforms.write_all(&self.queue, draws.uniforms());

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            let mut bound: Option<VertexKind> = None;
            for (slot, call) in draws.calls().iter().enumerate() {
                let Some(geometry) = self.geometry(call.geometry) else {
                    continue;
                };

                if bound != Some(geometry.kind) {
                    let name = match geometry.kind {
                        VertexKind::Textured => TEXTURED_PIPELINE,
                        VertexKind::VertexColor => VERTEX_COLOR_PIPELINE,
                    };
                    let Some(pipeline) = self.pipeline_manager.pipeline(name) else {
                        log::warn!("Pipeline '{name}' missing, skipping draw");
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    bound = Some(geometry.kind);
                }

                if geometry.kind == VertexKind::Textured {
                    let Some(texture) = call.texture else {
                        log::debug!("Node {:?} has no texture, skipping", call.node);
                        continue;
                    };
                    render_pass.set_bind_group(2, self.textures.bind_group(texture), &[]);
                }

                render_pass.set_bind_group(1, &self.draw_bind_group, &[self.draw_uniforms.offset(slot)]);
                render_pass.draw_geometry(geometry);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the render engine surface and recreates depth buffer
    ///
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions as (width, height) in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
