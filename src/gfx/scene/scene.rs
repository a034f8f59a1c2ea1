use log::{error, info, warn};

use super::error::SceneError;
use super::graph::{DrawSink, FrameContext, SceneGraph};
use super::living_room::{self, OrnamentPlacement};
use super::matrix_stack::MatrixStack;
use super::state::SceneState;
use crate::gfx::camera::{Camera, CameraController, RoomCamera};
use crate::gfx::resources::LightConfig;
use crate::obj::{DrawingInfo, MeshMailbox};

/// Main scene: the room graph, its animation state, camera and input
pub struct Scene {
    pub graph: SceneGraph,
    pub state: SceneState,
    pub camera: RoomCamera,
    pub controller: CameraController,
    pub light: LightConfig,
    stack: MatrixStack,
    mailbox: MeshMailbox,
    mesh_ready: bool,
}

impl Scene {
    pub fn new(
        camera: RoomCamera,
        light: LightConfig,
        ornament: &OrnamentPlacement,
    ) -> Result<Self, SceneError> {
        let graph = living_room::build(ornament)?;
        info!("Built living room with {} nodes", graph.len());
        let state = SceneState::with_view(camera.fovy.0, camera.elevation);

        let mut camera = camera;
        camera.sync(&state);

        Ok(Self {
            graph,
            state,
            camera,
            controller: CameraController::default(),
            light,
            stack: MatrixStack::new(),
            mailbox: MeshMailbox::new(),
            mesh_ready: false,
        })
    }

    /// Handle given to the mesh loader thread.
    pub fn mesh_mailbox(&self) -> MeshMailbox {
        self.mailbox.clone()
    }

    pub fn is_mesh_ready(&self) -> bool {
        self.mesh_ready
    }

    /// Call after the mesh buffers have been (re)uploaded or dropped.
    pub fn set_mesh_ready(&mut self, ready: bool) {
        self.mesh_ready = ready;
    }

    /// Takes a finished mesh load, if one arrived since the last frame.
    ///
    /// Returns the drawing info to upload. A failed load, or one with nothing
    /// to draw, clears the mesh and returns `None`.
    pub fn poll_mesh(&mut self) -> Option<DrawingInfo> {
        let result = self.mailbox.take()?;
        let info = result.and_then(|doc| {
            if !doc.is_mtl_complete() {
                warn!("{} material files never completed", doc.pending_material_count());
            }
            doc.drawing_info()
        });

        match info {
            Ok(info) if !info.is_empty() => {
                info!("Mesh ready: {} triangle corners", info.corner_count());
                Some(info)
            }
            Ok(_) => {
                warn!("Mesh has no faces, nothing to draw");
                self.mesh_ready = false;
                None
            }
            Err(err) => {
                error!("Mesh load failed: {err}");
                self.mesh_ready = false;
                None
            }
        }
    }

    /// Advances input and animation by one frame.
    pub fn update(&mut self) {
        self.controller.apply(&mut self.state);
        self.state.advance();
        self.camera.sync(&self.state);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }

    /// Walks the graph and hands every visible draw to `sink`.
    pub fn collect_draws<S: DrawSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), SceneError> {
        let frame = FrameContext {
            view_proj: self.camera.build_view_projection_matrix(),
            state: &self.state,
            mesh_ready: self.mesh_ready,
        };
        let result = self.graph.render(&frame, &mut self.stack, sink);
        if result.is_err() {
            // Start the next frame from a clean stack
            self.stack.clear();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::DrawCall;
    use crate::obj::{ObjDocument, ObjError, ObjLoadOptions};
    use winit::keyboard::KeyCode;

    fn scene() -> Scene {
        Scene::new(
            RoomCamera::default(),
            LightConfig::default(),
            &OrnamentPlacement::default(),
        )
        .unwrap()
    }

    #[test]
    fn mesh_is_consumed_exactly_once() {
        let mut scene = scene();
        assert!(scene.poll_mesh().is_none());

        let doc = ObjDocument::parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            ObjLoadOptions::default(),
            None,
        )
        .unwrap();
        scene.mesh_mailbox().post(Ok(doc));

        let info = scene.poll_mesh().unwrap();
        assert_eq!(info.corner_count(), 3);
        assert!(scene.poll_mesh().is_none());
    }

    #[test]
    fn failed_load_clears_the_mesh() {
        let mut scene = scene();
        scene.set_mesh_ready(true);
        scene
            .mesh_mailbox()
            .post(Err(ObjError::TooManyCorners(70_000)));
        assert!(scene.poll_mesh().is_none());
        assert!(!scene.is_mesh_ready());
    }

    #[test]
    fn ornament_appears_once_mesh_is_ready() {
        let mut scene = scene();
        let mut before: Vec<DrawCall> = Vec::new();
        scene.collect_draws(&mut before).unwrap();
        scene.set_mesh_ready(true);
        let mut after: Vec<DrawCall> = Vec::new();
        scene.collect_draws(&mut after).unwrap();
        assert_eq!(after.len(), before.len() + 1);
    }

    #[test]
    fn update_applies_input_then_animation() {
        let mut scene = scene();
        scene.controller.handle_key(KeyCode::KeyZ, true, false);
        scene.controller.handle_key(KeyCode::KeyT, true, false);
        scene.update();
        assert_eq!(scene.state.fov, 29.5);
        assert_eq!(scene.camera.fovy.0, 29.5);
        assert!(scene.state.tv_on);
        assert!(scene.state.speaker_scale > 1.0);
    }
}
