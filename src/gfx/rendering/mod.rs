//! Core rendering functionality
//!
//! Handles render pipelines, GPU geometry, and frame rendering.

pub mod draw_list;
pub mod geometry_buffers;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use draw_list::DrawList;
pub use geometry_buffers::{DrawGeometry, GeometryBuffers};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{InitError, RenderEngine};
