pub mod camera_controller;
pub mod camera_utils;
pub mod room_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{convert_matrix4_to_array, Camera, OPENGL_TO_WGPU_MATRIX};
pub use room_camera::RoomCamera;
