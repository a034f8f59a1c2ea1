//! Living Room
//!
//! An animated, textured living room drawn with wgpu: furniture built from
//! cubes and cylinders, an optional OBJ ornament loaded in the background,
//! and keyboard controls for the camera, TV, rug and lights.

pub mod app;
pub mod config;
pub mod gfx;
pub mod obj;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LivingRoomApp;
pub use config::RoomConfig;
