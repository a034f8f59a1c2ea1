//! # Animation State
//!
//! Everything that changes from frame to frame lives in [`SceneState`]: the
//! user-controlled view angles and toggles, plus the values the animations
//! step each frame. Keyboard handlers mutate it through the methods below and
//! the frame loop calls [`SceneState::advance`] once per frame.

/// Speaker pulse range and step
pub const SPEAKER_MIN_SCALE: f32 = 1.0;
pub const SPEAKER_MAX_SCALE: f32 = 1.05;
pub const SPEAKER_STEP: f32 = 0.005;

/// Degrees the rug turns per frame
pub const RUG_STEP_DEGREES: f32 = 3.0;
/// Degrees added to the rug target per key press
pub const RUG_TURN_DEGREES: f32 = 90.0;

/// Lamp shade heights in scene units
pub const SHADE_REST_HEIGHT: f32 = 58.0;
pub const SHADE_LOW_HEIGHT: f32 = 53.0;
pub const SHADE_STEP: f32 = 1.0;

pub const LIGHT_STEP: f32 = 0.05;
pub const LIGHT_MAX_INTENSITY: f32 = 1.0;
pub const LIGHT_MIN_INTENSITY: f32 = 0.3;

pub const MIN_FOV: f32 = 10.0;
pub const MAX_FOV: f32 = 50.0;
pub const MIN_ELEVATION: f32 = 0.0;
pub const MAX_ELEVATION: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    /// Spin of the whole room about Y, degrees in [0, 360)
    pub rotation_angle: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Camera eye height
    pub elevation: f32,
    pub tv_on: bool,
    pub speaker_scale: f32,
    pub speaker_growing: bool,
    pub rug_angle: f32,
    pub rug_target_angle: f32,
    pub animate_lamps: bool,
    pub shade_height: f32,
    pub light_on: bool,
    pub light_intensity: f32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            rotation_angle: 0.0,
            fov: 30.0,
            elevation: 30.0,
            tv_on: false,
            speaker_scale: SPEAKER_MIN_SCALE,
            speaker_growing: true,
            rug_angle: 0.0,
            rug_target_angle: 0.0,
            animate_lamps: false,
            shade_height: SHADE_REST_HEIGHT,
            light_on: true,
            light_intensity: LIGHT_MAX_INTENSITY,
        }
    }
}

impl SceneState {
    /// Default state with the camera placed from configuration.
    pub fn with_view(fov: f32, elevation: f32) -> Self {
        Self {
            fov: fov.clamp(MIN_FOV, MAX_FOV),
            elevation: elevation.clamp(MIN_ELEVATION, MAX_ELEVATION),
            ..Self::default()
        }
    }

    /// Steps every animation by one frame.
    pub fn advance(&mut self) {
        self.step_speakers();
        self.step_rug();
        self.step_shades();
        self.step_light();
    }

    fn step_speakers(&mut self) {
        if !self.tv_on {
            self.speaker_scale = SPEAKER_MIN_SCALE;
            self.speaker_growing = true;
            return;
        }
        if self.speaker_growing {
            self.speaker_scale += SPEAKER_STEP;
            if self.speaker_scale >= SPEAKER_MAX_SCALE {
                self.speaker_scale = SPEAKER_MAX_SCALE;
                self.speaker_growing = false;
            }
        } else {
            self.speaker_scale -= SPEAKER_STEP;
            if self.speaker_scale <= SPEAKER_MIN_SCALE {
                self.speaker_scale = SPEAKER_MIN_SCALE;
                self.speaker_growing = true;
            }
        }
    }

    fn step_rug(&mut self) {
        let remaining = self.rug_target_angle - self.rug_angle;
        if remaining.abs() <= RUG_STEP_DEGREES {
            self.rug_angle = self.rug_target_angle;
        } else {
            self.rug_angle += RUG_STEP_DEGREES.copysign(remaining);
        }
    }

    fn step_shades(&mut self) {
        if self.animate_lamps {
            if self.shade_height > SHADE_LOW_HEIGHT {
                self.shade_height -= SHADE_STEP;
            } else {
                self.animate_lamps = false;
            }
        } else if self.shade_height < SHADE_REST_HEIGHT {
            self.shade_height = (self.shade_height + SHADE_STEP).min(SHADE_REST_HEIGHT);
        }
    }

    fn step_light(&mut self) {
        self.light_intensity = if self.light_on {
            (self.light_intensity + LIGHT_STEP).min(LIGHT_MAX_INTENSITY)
        } else {
            (self.light_intensity - LIGHT_STEP).max(LIGHT_MIN_INTENSITY)
        };
    }

    /// Spins the room, keeping the angle in [0, 360).
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_angle = (self.rotation_angle + degrees).rem_euclid(360.0);
    }

    pub fn raise_camera(&mut self, delta: f32) {
        self.elevation = (self.elevation + delta).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.fov = (self.fov + delta).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn toggle_tv(&mut self) {
        self.tv_on = !self.tv_on;
    }

    pub fn turn_rug(&mut self) {
        self.rug_target_angle = self.rug_angle + RUG_TURN_DEGREES;
    }

    /// Flips the light and starts the shade slide.
    pub fn toggle_light(&mut self) {
        self.light_on = !self.light_on;
        self.animate_lamps = true;
    }
}
