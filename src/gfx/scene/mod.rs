//! # Scene Management Module
//!
//! The living room as a tree of transform nodes, the per-frame animation
//! state that drives it, and the traversal that turns it into draw calls.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns the graph, state, camera and input for one window
//! - [`SceneGraph`] - arena of [`SceneNode`]s rooted at the carpet
//! - [`MatrixStack`] - saves the parent transform around each subtree
//! - [`SceneState`] - view angles, toggles and animation values
//! - [`VertexKind`] - vertex buffer layouts for the two pipelines
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Matrix4, SquareMatrix};
//! use ::living_room::gfx::scene::{living_room, DrawCall, FrameContext, MatrixStack, SceneState};
//!
//! let graph = living_room::build(&Default::default()).unwrap();
//! let state = SceneState::default();
//! let frame = FrameContext { view_proj: Matrix4::identity(), state: &state, mesh_ready: false };
//!
//! let mut draws: Vec<DrawCall> = Vec::new();
//! graph.render(&frame, &mut MatrixStack::new(), &mut draws).unwrap();
//! assert_eq!(draws.len(), 48);
//! ```

pub mod error;
pub mod graph;
pub mod living_room;
pub mod matrix_stack;
pub mod scene;
pub mod state;
pub mod vertex;

// Re-export main types
pub use error::SceneError;
pub use graph::{
    DrawCall, DrawSink, DrawUniform, FrameContext, GeometryKind, NodeDriver, NodeId, SceneGraph,
    SceneNode, Surface,
};
pub use living_room::OrnamentPlacement;
pub use matrix_stack::MatrixStack;
pub use scene::Scene;
pub use state::SceneState;
pub use vertex::VertexKind;
