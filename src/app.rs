use std::sync::Arc;
use std::thread::JoinHandle;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::config::RoomConfig;
use crate::gfx::{rendering::DrawList, RenderEngine, Scene};
use crate::obj::spawn_obj_load;

pub struct LivingRoomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
    loader: Option<JoinHandle<()>>,
}

struct AppState {
    config: RoomConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    draws: DrawList,
    init_error: Option<anyhow::Error>,
}

impl LivingRoomApp {
    /// Builds the scene and starts loading the ornament mesh, if one is
    /// configured. The window and GPU are set up once the event loop runs.
    pub fn new(config: RoomConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        let camera = config.camera.camera(config.window.aspect());
        let scene = Scene::new(camera, config.lighting.light(), &config.mesh.placement())?;

        let loader = match &config.mesh.path {
            Some(path) => {
                info!("Loading mesh {}", path.display());
                Some(spawn_obj_load(
                    path.clone(),
                    config.mesh.load_options(),
                    scene.mesh_mailbox(),
                )?)
            }
            None => None,
        };

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                draws: DrawList::new(),
                init_error: None,
            },
            loader,
        })
    }

    /// Run the application (consumes self and blocks until the window closes)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        if let Some(loader) = self.loader.take() {
            if loader.is_finished() && loader.join().is_err() {
                warn!("Mesh loader thread panicked");
            }
        }

        match self.app_state.init_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        if let Some(info) = self.scene.poll_mesh() {
            render_engine.upload_mesh(&info);
            self.scene.set_mesh_ready(true);
        } else if !self.scene.is_mesh_ready() && render_engine.has_mesh() {
            render_engine.clear_mesh();
        }

        self.scene.update();

        self.draws.clear();
        if let Err(err) = self.scene.collect_draws(&mut self.draws) {
            error!("Scene traversal failed: {err}");
            return;
        }

        match render_engine.render_frame(
            &self.draws,
            &self.scene.light,
            self.scene.state.light_intensity,
        ) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_engine.get_surface_size();
                render_engine.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => warn!("Skipped frame: {err}"),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.init_error = Some(err.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let texture_dir = self.config.assets.texture_dir.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window, width, height, &texture_dir).await
        });

        match renderer {
            Ok(renderer) => {
                self.scene.resize(width, height);
                self.render_engine = Some(renderer);
            }
            Err(err) => {
                error!("Renderer failed to start: {err}");
                self.init_error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.scene.controller.process_keyed_events(&event);
                if self.scene.controller.quit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::Focused(false) => {
                self.scene.controller.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
