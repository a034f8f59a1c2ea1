//! # Matrix Stack
//!
//! Save/restore storage for the accumulated model transform while the scene
//! graph is walked. Every subtree is bracketed by one [`MatrixStack::push`] and
//! one [`MatrixStack::pop`], so siblings never observe each other's transforms.

use cgmath::Matrix4;

use super::error::SceneError;

/// Last-in-first-out container of 4x4 transform snapshots.
#[derive(Debug, Default, Clone)]
pub struct MatrixStack {
    saved: Vec<Matrix4<f32>>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self { saved: Vec::new() }
    }

    /// Stores a copy of `current`.
    pub fn push(&mut self, current: &Matrix4<f32>) {
        self.saved.push(*current);
    }

    /// Removes and returns the most recently pushed transform.
    ///
    /// Popping an empty stack is a traversal bug and is reported as
    /// [`SceneError::StackUnderflow`] instead of yielding garbage.
    pub fn pop(&mut self) -> Result<Matrix4<f32>, SceneError> {
        self.saved.pop().ok_or(SceneError::StackUnderflow)
    }

    /// Number of transforms currently saved.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Drops every saved transform.
    pub fn clear(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, SquareMatrix, Vector3};

    #[test]
    fn pop_restores_pushed_matrix_exactly() {
        let mut stack = MatrixStack::new();
        let original = Matrix4::from_translation(Vector3::new(0.3, -1.7, 2.25))
            * Matrix4::from_angle_y(Deg(33.0))
            * Matrix4::from_nonuniform_scale(0.1, 15.0, 0.1);

        let mut current = original;
        stack.push(&current);
        current = current * Matrix4::from_nonuniform_scale(4.0, 4.0, 4.0);
        current = current * Matrix4::from_translation(Vector3::new(9.0, 9.0, 9.0));
        assert_ne!(current, original);

        current = stack.pop().unwrap();
        assert_eq!(current, original);
        assert!(stack.is_empty());
    }

    #[test]
    fn nested_pushes_unwind_in_reverse_order() {
        let mut stack = MatrixStack::new();
        let a = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let b = Matrix4::from_translation(Vector3::new(0.0, 2.0, 0.0));
        let c = Matrix4::from_translation(Vector3::new(0.0, 0.0, 3.0));

        stack.push(&a);
        stack.push(&b);
        stack.push(&c);
        assert_eq!(stack.depth(), 3);

        assert_eq!(stack.pop().unwrap(), c);
        assert_eq!(stack.pop().unwrap(), b);
        assert_eq!(stack.pop().unwrap(), a);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let mut stack = MatrixStack::new();
        assert_eq!(stack.pop(), Err(SceneError::StackUnderflow));

        stack.push(&Matrix4::identity());
        stack.clear();
        assert_eq!(stack.pop(), Err(SceneError::StackUnderflow));
    }
}
