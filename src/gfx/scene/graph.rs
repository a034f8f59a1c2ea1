//! # Scene Graph
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`].
//! Rendering walks the tree depth-first, accumulating `parent * local`
//! transforms and saving the parent's matrix on a [`MatrixStack`] around
//! each child, so sibling subtrees always start from the same matrix.
//!
//! The traversal does not talk to the GPU. Each drawable node becomes a
//! [`DrawCall`] handed to a [`DrawSink`]; the renderer collects them into a
//! draw list and tests collect them into a `Vec`.

use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix, Matrix4, SquareMatrix, Vector3};

use super::error::SceneError;
use super::matrix_stack::MatrixStack;
use super::state::SceneState;
use crate::gfx::camera::convert_matrix4_to_array;
use crate::gfx::resources::TextureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Shape a node draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Cube,
    Cylinder,
    /// The loaded OBJ mesh; skipped until it is ready
    Mesh,
}

/// How a node is coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Texture(TextureId),
    /// Shows `on` unlit while the TV is on, `off` lit otherwise
    TvScreen { on: TextureId, off: TextureId },
    /// Per-vertex colours from the mesh's materials
    VertexColor,
}

/// Ties part of a node's transform to the animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeDriver {
    /// Rotation angle about Y follows `rotation_angle`
    SceneSpin,
    /// Rotation angle about Y follows `rug_angle`
    RugTurn,
    /// Translation Y follows `shade_height`
    ShadeSlide,
    /// Scale is multiplied by `speaker_scale`
    SpeakerPulse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub translation: Vector3<f32>,
    pub rotation: Option<(Vector3<f32>, Deg<f32>)>,
    pub scale: Vector3<f32>,
    pub geometry: Option<GeometryKind>,
    pub surface: Surface,
    pub driver: Option<NodeDriver>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    /// A transform-only node at the origin with unit scale.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: None,
            scale: Vector3::new(1.0, 1.0, 1.0),
            geometry: None,
            surface: Surface::VertexColor,
            driver: None,
            children: Vec::new(),
        }
    }

    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn rotate_y(mut self, degrees: f32) -> Self {
        self.rotation = Some((Vector3::unit_y(), Deg(degrees)));
        self
    }

    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn cube(mut self, texture: TextureId) -> Self {
        self.geometry = Some(GeometryKind::Cube);
        self.surface = Surface::Texture(texture);
        self
    }

    pub fn cylinder(mut self, texture: TextureId) -> Self {
        self.geometry = Some(GeometryKind::Cylinder);
        self.surface = Surface::Texture(texture);
        self
    }

    pub fn mesh(mut self) -> Self {
        self.geometry = Some(GeometryKind::Mesh);
        self.surface = Surface::VertexColor;
        self
    }

    pub fn surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn driven_by(mut self, driver: NodeDriver) -> Self {
        self.driver = Some(driver);
        self
    }

    /// `T * R * S` with any animated component taken from `state`.
    pub fn local_matrix(&self, state: &SceneState) -> Matrix4<f32> {
        let mut translation = self.translation;
        let mut rotation = self.rotation;
        let mut scale = self.scale;

        match self.driver {
            Some(NodeDriver::SceneSpin) => {
                rotation = Some((Vector3::unit_y(), Deg(state.rotation_angle)));
            }
            Some(NodeDriver::RugTurn) => {
                rotation = Some((Vector3::unit_y(), Deg(state.rug_angle)));
            }
            Some(NodeDriver::ShadeSlide) => translation.y = state.shade_height,
            Some(NodeDriver::SpeakerPulse) => scale *= state.speaker_scale,
            None => {}
        }

        let rotation = rotation.map_or(Matrix4::identity(), |(axis, angle)| {
            Matrix4::from_axis_angle(axis, angle)
        });
        Matrix4::from_translation(translation)
            * rotation
            * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
    }

    /// Texture and unlit flag for this frame. `None` texture means vertex
    /// colours.
    pub fn resolve_surface(&self, state: &SceneState) -> (Option<TextureId>, bool) {
        match self.surface {
            Surface::Texture(texture) => (Some(texture), false),
            Surface::TvScreen { on, .. } if state.tv_on => (Some(on), true),
            Surface::TvScreen { off, .. } => (Some(off), false),
            Surface::VertexColor => (None, false),
        }
    }
}

/// Per-draw uniform block
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`
    pub normal: [[f32; 4]; 4],
    /// x: 1.0 skips lighting
    pub flags: [f32; 4],
}

impl DrawUniform {
    pub fn new(view_proj: &Matrix4<f32>, model: &Matrix4<f32>, unlit: bool) -> Self {
        let normal = model
            .invert()
            .map_or(Matrix4::identity(), |inverse| inverse.transpose());
        Self {
            mvp: convert_matrix4_to_array(view_proj * model),
            model: convert_matrix4_to_array(*model),
            normal: convert_matrix4_to_array(normal),
            flags: [if unlit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn is_unlit(&self) -> bool {
        self.flags[0] == 1.0
    }
}

/// One drawable node, fully resolved for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub node: NodeId,
    pub geometry: GeometryKind,
    pub texture: Option<TextureId>,
    pub uniform: DrawUniform,
}

/// Receives draw calls in traversal order
pub trait DrawSink {
    fn draw(&mut self, call: DrawCall);
}

impl DrawSink for Vec<DrawCall> {
    fn draw(&mut self, call: DrawCall) {
        self.push(call);
    }
}

/// Per-frame inputs to a traversal
pub struct FrameContext<'a> {
    pub view_proj: Matrix4<f32>,
    pub state: &'a SceneState,
    /// Whether the mesh buffers have been uploaded
    pub mesh_ready: bool,
}

#[derive(Debug, Default, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: Option<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and makes it the root, replacing any previous root.
    pub fn add_root(&mut self, node: SceneNode) -> NodeId {
        let id = self.insert(node);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.insert(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// First node with this name, in insertion order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Emits one draw call per visible drawable node, parents before
    /// children and siblings in insertion order.
    pub fn render<S: DrawSink + ?Sized>(
        &self,
        frame: &FrameContext<'_>,
        stack: &mut MatrixStack,
        sink: &mut S,
    ) -> Result<(), SceneError> {
        if !stack.is_empty() {
            return Err(SceneError::UnbalancedStack(stack.depth()));
        }
        let Some(root) = self.root else {
            return Ok(());
        };

        let mut current = Matrix4::identity();
        self.visit(root, &mut current, frame, stack, sink)?;

        if stack.is_empty() {
            Ok(())
        } else {
            Err(SceneError::UnbalancedStack(stack.depth()))
        }
    }

    fn visit<S: DrawSink + ?Sized>(
        &self,
        id: NodeId,
        current: &mut Matrix4<f32>,
        frame: &FrameContext<'_>,
        stack: &mut MatrixStack,
        sink: &mut S,
    ) -> Result<(), SceneError> {
        let node = self.node(id).ok_or(SceneError::UnknownNode(id))?;
        *current = *current * node.local_matrix(frame.state);

        if let Some(geometry) = node.geometry {
            if geometry != GeometryKind::Mesh || frame.mesh_ready {
                let (texture, unlit) = node.resolve_surface(frame.state);
                sink.draw(DrawCall {
                    node: id,
                    geometry,
                    texture,
                    uniform: DrawUniform::new(&frame.view_proj, current, unlit),
                });
            }
        }

        for &child in &node.children {
            stack.push(current);
            self.visit(child, current, frame, stack, sink)?;
            *current = stack.pop()?;
        }
        Ok(())
    }
}
