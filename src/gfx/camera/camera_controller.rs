use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::scene::SceneState;

/// Keys that act on every frame while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldKey {
    RotateLeft,
    RotateRight,
    Raise,
    Lower,
    ZoomIn,
    ZoomOut,
}

/// Keys that act once per press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKey {
    Tv,
    Rug,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Hold(HeldKey),
    Toggle(ToggleKey),
    Quit,
}

/// Key bindings
pub fn action_for(code: KeyCode) -> Option<ControlAction> {
    use ControlAction::*;
    Some(match code {
        KeyCode::ArrowLeft => Hold(HeldKey::RotateLeft),
        KeyCode::ArrowRight => Hold(HeldKey::RotateRight),
        KeyCode::ArrowUp => Hold(HeldKey::Raise),
        KeyCode::ArrowDown => Hold(HeldKey::Lower),
        KeyCode::KeyZ => Hold(HeldKey::ZoomIn),
        KeyCode::KeyX => Hold(HeldKey::ZoomOut),
        KeyCode::KeyT => Toggle(ToggleKey::Tv),
        KeyCode::KeyR => Toggle(ToggleKey::Rug),
        KeyCode::KeyL => Toggle(ToggleKey::Light),
        KeyCode::Escape => Quit,
        _ => return None,
    })
}

/// Turns keyboard events into changes to the [`SceneState`]
pub struct CameraController {
    pub rotate_speed: f32,
    pub tilt_speed: f32,
    pub zoom_speed: f32,
    held: HashSet<HeldKey>,
    pending: Vec<ToggleKey>,
    quit_requested: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, tilt_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            tilt_speed,
            zoom_speed,
            held: HashSet::new(),
            pending: Vec::new(),
            quit_requested: false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state == ElementState::Pressed, event.repeat);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        match action_for(code) {
            Some(ControlAction::Hold(key)) => {
                if pressed {
                    self.held.insert(key);
                } else {
                    self.held.remove(&key);
                }
            }
            Some(ControlAction::Toggle(key)) if pressed && !repeat => self.pending.push(key),
            Some(ControlAction::Quit) if pressed => self.quit_requested = true,
            _ => (),
        }
    }

    /// Forgets held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.held.contains(&key)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Applies held keys for one frame and any toggles pressed since the
    /// last call.
    pub fn apply(&mut self, state: &mut SceneState) {
        for key in &self.held {
            match key {
                HeldKey::RotateLeft => state.rotate(self.rotate_speed),
                HeldKey::RotateRight => state.rotate(-self.rotate_speed),
                HeldKey::Raise => state.raise_camera(self.tilt_speed),
                HeldKey::Lower => state.raise_camera(-self.tilt_speed),
                HeldKey::ZoomIn => state.zoom(-self.zoom_speed),
                HeldKey::ZoomOut => state.zoom(self.zoom_speed),
            }
        }
        for key in self.pending.drain(..) {
            match key {
                ToggleKey::Tv => state.toggle_tv(),
                ToggleKey::Rug => state.turn_rug(),
                ToggleKey::Light => state.toggle_light(),
            }
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(1.0, 0.5, 0.5)
    }
}
