//! Flat-ground kinematic movement.
//!
//! The ground is the plane `z = ground_z`. Walking keeps the character on it;
//! a jump launches it into [`MovementMode::Falling`] until gravity brings it
//! back down.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;
use crate::math::rotate_toward;

/// Below this horizontal speed the character does not turn to face its velocity.
const MIN_ORIENT_SPEED_SQ: f32 = 1e-4;

/// Movement mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// On the ground
    #[default]
    Walking,
    /// In the air
    Falling,
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    /// New actor location
    pub location: Vec3,
    /// New actor yaw in degrees
    pub yaw: f32,
}

/// Character movement state.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterMovement {
    config: MovementConfig,
    velocity: Vec3,
    pending_input: Vec3,
    mode: MovementMode,
    ground_z: f32,
    jump_requested: bool,
}

impl CharacterMovement {
    /// Movement standing on the plane `z = ground_z`.
    #[must_use]
    pub fn new(config: MovementConfig, ground_z: f32) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            pending_input: Vec3::ZERO,
            mode: MovementMode::Walking,
            ground_z,
            jump_requested: false,
        }
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    /// True while airborne.
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.mode == MovementMode::Falling
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Input accumulated since the last step.
    #[must_use]
    pub fn pending_input(&self) -> Vec3 {
        self.pending_input
    }

    /// Accumulate movement input in world space. Only the horizontal part is used.
    pub fn add_input_vector(&mut self, direction: Vec3) {
        self.pending_input += direction;
    }

    /// Ask for a jump on the next step. Ignored while falling.
    pub fn jump(&mut self) {
        if self.mode == MovementMode::Walking {
            self.jump_requested = true;
        }
    }

    /// Cancel a jump that has not fired yet.
    pub fn stop_jumping(&mut self) {
        self.jump_requested = false;
    }

    /// Advance by `dt` seconds from `location` facing `yaw`.
    pub fn step(&mut self, dt: f32, location: Vec3, yaw: f32) -> MovementStep {
        let input = self.pending_input.truncate().clamp_length_max(1.0);
        self.pending_input = Vec3::ZERO;

        if self.jump_requested && self.mode == MovementMode::Walking {
            self.velocity.z = self.config.jump_z_velocity;
            self.mode = MovementMode::Falling;
            tracing::debug!(velocity_z = self.velocity.z, "jump");
        }
        self.jump_requested = false;

        let horizontal = self.step_horizontal(dt, input);
        self.velocity.x = horizontal.x;
        self.velocity.y = horizontal.y;

        if self.mode == MovementMode::Falling {
            self.velocity.z += self.config.gravity_z * dt;
        }

        let mut location = location + self.velocity * dt;
        if self.mode == MovementMode::Falling
            && location.z <= self.ground_z
            && self.velocity.z <= 0.0
        {
            location.z = self.ground_z;
            self.velocity.z = 0.0;
            self.mode = MovementMode::Walking;
            tracing::debug!("landed");
        }

        let mut yaw = yaw;
        if self.config.orient_rotation_to_movement
            && horizontal.length_squared() > MIN_ORIENT_SPEED_SQ
        {
            let target = horizontal.y.atan2(horizontal.x).to_degrees();
            yaw = rotate_toward(yaw, target, self.config.rotation_rate_yaw * dt);
        }

        MovementStep { location, yaw }
    }

    fn step_horizontal(&self, dt: f32, input: Vec2) -> Vec2 {
        let mut velocity = self.velocity.truncate();
        let magnitude = input.length();

        if magnitude > 0.0 {
            let control = match self.mode {
                MovementMode::Walking => 1.0,
                MovementMode::Falling => self.config.air_control,
            };
            let max_speed = (self.config.max_walk_speed * magnitude)
                .max(self.config.min_analog_walk_speed)
                .min(self.config.max_walk_speed);
            velocity += input / magnitude * self.config.max_acceleration * control * dt;
            velocity.clamp_length_max(max_speed)
        } else {
            let braking = match self.mode {
                MovementMode::Walking => self.config.braking_deceleration_walking,
                MovementMode::Falling => self.config.braking_deceleration_falling,
            };
            let speed = velocity.length();
            if speed <= braking * dt {
                Vec2::ZERO
            } else {
                velocity * ((speed - braking * dt) / speed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn movement() -> CharacterMovement {
        CharacterMovement::new(MovementConfig::default(), 0.0)
    }

    fn run(m: &mut CharacterMovement, steps: usize, input: Vec3) -> MovementStep {
        let mut state = MovementStep {
            location: Vec3::ZERO,
            yaw: 0.0,
        };
        for _ in 0..steps {
            m.add_input_vector(input);
            state = m.step(DT, state.location, state.yaw);
        }
        state
    }

    mod walking_tests {
        use super::*;

        #[test]
        fn speed_caps_at_max_walk_speed() {
            let mut m = movement();
            run(&mut m, 120, Vec3::X);
            assert!((m.velocity().length() - 500.0).abs() < 1e-3);
        }

        #[test]
        fn half_stick_caps_at_half_speed() {
            let mut m = movement();
            run(&mut m, 120, Vec3::X * 0.5);
            assert!((m.velocity().length() - 250.0).abs() < 1e-3);
        }

        #[test]
        fn tiny_input_uses_min_analog_speed() {
            let mut m = movement();
            run(&mut m, 120, Vec3::X * 0.01);
            assert!((m.velocity().length() - 20.0).abs() < 1e-3);
        }

        #[test]
        fn braking_stops_the_character() {
            let mut m = movement();
            run(&mut m, 60, Vec3::X);
            run(&mut m, 60, Vec3::ZERO);
            assert_eq!(m.velocity(), Vec3::ZERO);
        }

        #[test]
        fn stays_on_the_ground() {
            let mut m = CharacterMovement::new(MovementConfig::default(), 25.0);
            let step = m.step(DT, Vec3::new(0.0, 0.0, 25.0), 0.0);
            assert_eq!(step.location.z, 25.0);
        }

        #[test]
        fn turns_toward_velocity_at_rotation_rate() {
            let mut m = movement();
            m.add_input_vector(Vec3::Y);
            let step = m.step(DT, Vec3::ZERO, 0.0);
            // 500 deg/s for one frame
            assert!((step.yaw - 500.0 * DT).abs() < 1e-3);
        }

        #[test]
        fn no_turning_when_orientation_disabled() {
            let config = MovementConfig {
                orient_rotation_to_movement: false,
                ..MovementConfig::default()
            };
            let mut m = CharacterMovement::new(config, 0.0);
            m.add_input_vector(Vec3::Y);
            assert_eq!(m.step(DT, Vec3::ZERO, 0.0).yaw, 0.0);
        }
    }

    mod jump_tests {
        use super::*;

        #[test]
        fn jump_launches_and_lands() {
            let mut m = movement();
            m.jump();
            let mut state = run(&mut m, 1, Vec3::ZERO);
            assert!(m.is_falling());
            assert!(state.location.z > 0.0);

            // 700 / 980 s up and the same down, well under 2 s
            for _ in 0..120 {
                state = m.step(DT, state.location, state.yaw);
            }
            assert_eq!(m.mode(), MovementMode::Walking);
            assert_eq!(state.location.z, 0.0);
        }

        #[test]
        fn stop_jumping_before_step_cancels() {
            let mut m = movement();
            m.jump();
            m.stop_jumping();
            run(&mut m, 1, Vec3::ZERO);
            assert!(!m.is_falling());
        }

        #[test]
        fn jump_in_air_is_ignored() {
            let mut m = movement();
            m.jump();
            run(&mut m, 1, Vec3::ZERO);
            let vz = m.velocity().z;
            m.jump();
            m.step(DT, Vec3::new(0.0, 0.0, 10.0), 0.0);
            assert!(m.velocity().z < vz);
        }

        #[test]
        fn air_control_limits_acceleration() {
            let mut grounded = movement();
            grounded.add_input_vector(Vec3::X);
            grounded.step(DT, Vec3::ZERO, 0.0);

            let mut airborne = movement();
            airborne.jump();
            airborne.add_input_vector(Vec3::X);
            airborne.step(DT, Vec3::ZERO, 0.0);

            let ratio = airborne.velocity().x / grounded.velocity().x;
            assert!((ratio - 0.35).abs() < 1e-4);
        }
    }
}
