use super::graph::NodeId;

/// Errors raised while walking the scene graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Attempted to pop a transform from an empty matrix stack")]
    StackUnderflow,
    #[error("Node {0:?} does not exist in this scene graph")]
    UnknownNode(NodeId),
    #[error("Matrix stack left at depth {0} after traversal")]
    UnbalancedStack(usize),
}
