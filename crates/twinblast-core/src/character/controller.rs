//! Player controller: owns the control rotation that look input steers.

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::math::{normalize_axis, Rotator};

/// Control rotation owner for a possessed character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    control_rotation: Rotator,
    pitch_min: f32,
    pitch_max: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl PlayerController {
    /// Controller using the pitch limits from `camera`.
    #[must_use]
    pub fn new(camera: &CameraConfig) -> Self {
        Self {
            control_rotation: Rotator::ZERO,
            pitch_min: camera.view_pitch_min,
            pitch_max: camera.view_pitch_max,
        }
    }

    /// Controller starting out facing `yaw`.
    #[must_use]
    pub fn facing(camera: &CameraConfig, yaw: f32) -> Self {
        let mut controller = Self::new(camera);
        controller.control_rotation.yaw = normalize_axis(yaw);
        controller
    }

    /// Current control rotation.
    #[must_use]
    pub fn control_rotation(&self) -> Rotator {
        self.control_rotation
    }

    /// Overwrite the control rotation, re-applying the pitch clamp.
    pub fn set_control_rotation(&mut self, rotation: Rotator) {
        self.control_rotation = Rotator::new(
            self.clamp_pitch(normalize_axis(rotation.pitch)),
            normalize_axis(rotation.yaw),
            0.0,
        );
    }

    /// Turn by `delta` degrees of yaw.
    pub fn add_yaw_input(&mut self, delta: f32) {
        self.control_rotation.yaw = normalize_axis(self.control_rotation.yaw + delta);
    }

    /// Tilt by `delta` degrees of pitch, clamped to the view limits.
    pub fn add_pitch_input(&mut self, delta: f32) {
        self.control_rotation.pitch = self.clamp_pitch(self.control_rotation.pitch + delta);
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(self.pitch_min, self.pitch_max)
    }
}
