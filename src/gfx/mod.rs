//! # Graphics Module
//!
//! Everything between the scene description and the screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - fixed-distance room camera and keyboard controls
//! - **Geometry** ([`geometry`]) - procedural cube and cylinder
//! - **Rendering Pipeline** ([`rendering`]) - textured and vertex-colour pipelines
//! - **Scene Management** ([`scene`]) - transform hierarchy, animation state and traversal
//! - **Resource Management** ([`resources`]) - textures, lighting uniforms
//!
//! ## Usage
//!
//! The graphics system is primarily used through the [`RenderEngine`] and [`Scene`] types:
//!
//! ```no_run
//! use living_room::gfx::{rendering::DrawList, Scene};
//!
//! # fn frame(scene: &mut Scene, engine: &mut living_room::gfx::RenderEngine) {
//! let mut draws = DrawList::new();
//! scene.update();
//! scene.collect_draws(&mut draws).unwrap();
//! engine
//!     .render_frame(&draws, &scene.light, scene.state.light_intensity)
//!     .unwrap();
//! # }
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::RoomCamera;
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
