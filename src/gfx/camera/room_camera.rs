use cgmath::*;

use super::camera_utils::{Camera, OPENGL_TO_WGPU_MATRIX};
use crate::gfx::scene::SceneState;

/// Perspective camera on the diagonal `(d, elevation, d)` looking at the
/// room's centre.
#[derive(Debug, Clone, Copy)]
pub struct RoomCamera {
    pub distance: f32,
    pub elevation: f32,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Fixed turn applied to the room before viewing
    pub scene_yaw: Deg<f32>,
}

impl Camera for RoomCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.eye(), Point3::origin(), Vector3::unit_y());
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view * Matrix4::from_angle_y(self.scene_yaw)
    }
}

impl RoomCamera {
    pub fn new(distance: f32, aspect: f32) -> Self {
        Self {
            distance,
            aspect,
            ..Self::default()
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        Point3::new(self.distance, self.elevation, self.distance)
    }

    /// Picks up the user-controlled view angles.
    pub fn sync(&mut self, state: &SceneState) {
        self.fovy = Deg(state.fov);
        self.elevation = state.elevation;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for RoomCamera {
    fn default() -> Self {
        Self {
            distance: 30.0,
            elevation: 30.0,
            fovy: Deg(30.0),
            aspect: 1.0,
            znear: 1.0,
            zfar: 100.0,
            scene_yaw: Deg(90.0),
        }
    }
}
