use crate::gfx::scene::{DrawCall, DrawSink, DrawUniform};

/// Draw calls collected from one traversal, in submission order
///
/// Reused across frames so the allocations stick around.
#[derive(Debug, Default)]
pub struct DrawList {
    calls: Vec<DrawCall>,
    uniforms: Vec<DrawUniform>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.uniforms.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Uniform block of every call, packed for the dynamic uniform buffer.
    /// Slot `i` belongs to `calls()[i]`.
    pub fn uniforms(&self) -> &[DrawUniform] {
        &self.uniforms
    }
}

impl DrawSink for DrawList {
    fn draw(&mut self, call: DrawCall) {
        self.uniforms.push(call.uniform);
        self.calls.push(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{living_room, FrameContext, GeometryKind, MatrixStack, SceneState};
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    fn collects_calls_and_uniforms_in_step() {
        let graph = living_room::build(&Default::default()).unwrap();
        let state = SceneState::default();
        let frame = FrameContext {
            view_proj: Matrix4::identity(),
            state: &state,
            mesh_ready: true,
        };

        let mut list = DrawList::new();
        graph
            .render(&frame, &mut MatrixStack::new(), &mut list)
            .unwrap();

        assert_eq!(list.len(), 49);
        assert_eq!(list.uniforms().len(), list.len());
        for (call, uniform) in list.calls().iter().zip(list.uniforms()) {
            assert_eq!(&call.uniform, uniform);
        }
        assert_eq!(list.calls()[0].geometry, GeometryKind::Cube);
        assert_eq!(
            list.calls()
                .iter()
                .filter(|c| c.geometry == GeometryKind::Mesh)
                .count(),
            1
        );

        list.clear();
        assert!(list.is_empty());
        assert!(list.uniforms().is_empty());
    }
}
