//! Rotations in degrees, Z-up, X-forward.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Pitch/yaw/roll rotation in degrees.
///
/// Yaw turns around +Z (0° faces +X, 90° faces +Y), pitch tilts the forward
/// axis up toward +Z. Roll is carried for completeness but does not affect
/// [`forward`](Self::forward) or [`right`](Self::right).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation around the right axis, positive looks up
    pub pitch: f32,
    /// Rotation around the up axis
    pub yaw: f32,
    /// Rotation around the forward axis
    pub roll: f32,
}

impl Rotator {
    /// No rotation.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    /// Create a rotator.
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Create a yaw-only rotator.
    #[must_use]
    pub const fn from_yaw(yaw: f32) -> Self {
        Self::new(0.0, yaw, 0.0)
    }

    /// Drop pitch and roll, keeping only the heading.
    #[must_use]
    pub const fn yaw_only(self) -> Self {
        Self::from_yaw(self.yaw)
    }

    /// Unit forward vector.
    #[must_use]
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Unit right vector (horizontal).
    #[must_use]
    pub fn right(self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(-sy, cy, 0.0)
    }

    /// Same rotation with every axis wrapped into `(-180, 180]`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(
            normalize_axis(self.pitch),
            normalize_axis(self.yaw),
            normalize_axis(self.roll),
        )
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_axis(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Turn `current` toward `target` along the shortest arc, by at most `max_step` degrees.
#[must_use]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_axis(target - current);
    if delta.abs() <= max_step {
        normalize_axis(target)
    } else {
        normalize_axis(current + max_step.copysign(delta))
    }
}
