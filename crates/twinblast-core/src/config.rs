//! Character and game mode configuration.
//!
//! Defaults reproduce the tuning of the shipped character; every struct
//! deserializes from JSON with missing fields falling back to those
//! defaults, so a config file only needs to list what it changes.
//!
//! # Example
//!
//! ```
//! use twinblast_core::config::CharacterConfig;
//!
//! let config = CharacterConfig::from_json_str(r#"{ "movement": { "max_walk_speed": 650.0 } }"#)
//!     .unwrap();
//! assert_eq!(config.movement.max_walk_speed, 650.0);
//! assert_eq!(config.movement.jump_z_velocity, 700.0);
//! ```

use std::path::Path;

use hitscan::CollisionChannels;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assets::{DEFAULT_PAWN_CLASS, FIRE_MONTAGE_PATH};
use crate::attack::ATTACK_RANGE;
use crate::error::ConfigError;

/// Collision capsule dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Capsule radius
    pub radius: f32,
    /// Distance from the capsule center to either tip
    pub half_height: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            radius: 42.0,
            half_height: 96.0,
        }
    }
}

/// Character movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Turn the character to face its velocity
    pub orient_rotation_to_movement: bool,
    /// Yaw turn rate in degrees per second
    pub rotation_rate_yaw: f32,
    /// Initial upward speed of a jump
    pub jump_z_velocity: f32,
    /// Fraction of ground acceleration available while falling
    pub air_control: f32,
    /// Top ground speed at full stick deflection
    pub max_walk_speed: f32,
    /// Floor on target speed for small analog deflections
    pub min_analog_walk_speed: f32,
    /// Acceleration toward the input direction
    pub max_acceleration: f32,
    /// Deceleration with no input while walking
    pub braking_deceleration_walking: f32,
    /// Deceleration with no input while falling
    pub braking_deceleration_falling: f32,
    /// Vertical acceleration while falling
    pub gravity_z: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            orient_rotation_to_movement: true,
            rotation_rate_yaw: 500.0,
            jump_z_velocity: 700.0,
            air_control: 0.35,
            max_walk_speed: 500.0,
            min_analog_walk_speed: 20.0,
            max_acceleration: 2048.0,
            braking_deceleration_walking: 2000.0,
            braking_deceleration_falling: 1500.0,
            gravity_z: -980.0,
        }
    }
}

/// Camera boom and follow camera setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Boom length when nothing is in the way
    pub target_arm_length: f32,
    /// Rotate the boom with the controller instead of the character
    pub use_pawn_control_rotation: bool,
    /// Rotate the camera itself with the controller
    pub camera_uses_pawn_control_rotation: bool,
    /// Pull the camera in when the boom is blocked
    pub do_collision_test: bool,
    /// Lowest controller pitch
    pub view_pitch_min: f32,
    /// Highest controller pitch
    pub view_pitch_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target_arm_length: 400.0,
            use_pawn_control_rotation: true,
            camera_uses_pawn_control_rotation: false,
            do_collision_test: true,
            view_pitch_min: -89.9,
            view_pitch_max: 89.9,
        }
    }
}

/// Attack hit-scan setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Length of the hit-scan segment
    pub range: f32,
    /// Channel the hit-scan runs on
    pub trace_channel: CollisionChannels,
    /// Asset path of the attack montage
    pub montage: String,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            range: ATTACK_RANGE,
            trace_channel: CollisionChannels::ATTACK,
            montage: FIRE_MONTAGE_PATH.to_string(),
        }
    }
}

/// Complete character configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Collision capsule
    pub capsule: CapsuleConfig,
    /// Movement tuning
    pub movement: MovementConfig,
    /// Camera rig
    pub camera: CameraConfig,
    /// Attack hit-scan
    pub attack: AttackConfig,
}

impl CharacterConfig {
    /// Parse and validate a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("capsule.radius", self.capsule.radius)?;
        positive("capsule.half_height", self.capsule.half_height)?;
        if self.capsule.half_height < self.capsule.radius {
            return Err(ConfigError::invalid(
                "capsule.half_height",
                format!(
                    "{} is shorter than the radius {}",
                    self.capsule.half_height, self.capsule.radius
                ),
            ));
        }

        let m = &self.movement;
        non_negative("movement.rotation_rate_yaw", m.rotation_rate_yaw)?;
        non_negative("movement.jump_z_velocity", m.jump_z_velocity)?;
        non_negative("movement.max_walk_speed", m.max_walk_speed)?;
        non_negative("movement.min_analog_walk_speed", m.min_analog_walk_speed)?;
        non_negative("movement.max_acceleration", m.max_acceleration)?;
        non_negative(
            "movement.braking_deceleration_walking",
            m.braking_deceleration_walking,
        )?;
        non_negative(
            "movement.braking_deceleration_falling",
            m.braking_deceleration_falling,
        )?;
        if !(0.0..=1.0).contains(&m.air_control) {
            return Err(ConfigError::invalid(
                "movement.air_control",
                format!("{} is outside [0, 1]", m.air_control),
            ));
        }
        if !(m.gravity_z.is_finite() && m.gravity_z <= 0.0) {
            return Err(ConfigError::invalid(
                "movement.gravity_z",
                format!("{} must be finite and not point up", m.gravity_z),
            ));
        }

        non_negative("camera.target_arm_length", self.camera.target_arm_length)?;
        if self.camera.view_pitch_min > self.camera.view_pitch_max {
            return Err(ConfigError::invalid(
                "camera.view_pitch_min",
                "exceeds camera.view_pitch_max",
            ));
        }

        positive("attack.range", self.attack.range)?;
        if self.attack.trace_channel.is_empty() {
            return Err(ConfigError::invalid(
                "attack.trace_channel",
                "no channel selected",
            ));
        }
        Ok(())
    }
}

/// Game mode configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameModeConfig {
    /// Asset path of the pawn class spawned for players
    pub default_pawn_class: String,
}

impl Default for GameModeConfig {
    fn default() -> Self {
        Self {
            default_pawn_class: DEFAULT_PAWN_CLASS.to_string(),
        }
    }
}

impl GameModeConfig {
    /// Load a game mode config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must not be negative"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tuning() {
        let config = CharacterConfig::default();
        assert_eq!(config.capsule.radius, 42.0);
        assert_eq!(config.capsule.half_height, 96.0);
        assert!(config.movement.orient_rotation_to_movement);
        assert_eq!(config.movement.rotation_rate_yaw, 500.0);
        assert_eq!(config.movement.jump_z_velocity, 700.0);
        assert_eq!(config.movement.air_control, 0.35);
        assert_eq!(config.movement.max_walk_speed, 500.0);
        assert_eq!(config.movement.min_analog_walk_speed, 20.0);
        assert_eq!(config.movement.braking_deceleration_walking, 2000.0);
        assert_eq!(config.movement.braking_deceleration_falling, 1500.0);
        assert_eq!(config.camera.target_arm_length, 400.0);
        assert!(config.camera.use_pawn_control_rotation);
        assert!(!config.camera.camera_uses_pawn_control_rotation);
        assert_eq!(config.attack.range, 10_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = CharacterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CharacterConfig::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CharacterConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn negative_range_is_rejected() {
        let err = CharacterConfig::from_json_str(r#"{ "attack": { "range": -1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "attack.range",
                ..
            }
        ));
    }

    #[test]
    fn air_control_out_of_range_is_rejected() {
        let mut config = CharacterConfig::default();
        config.movement.air_control = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "movement.air_control",
                ..
            })
        ));
    }

    #[test]
    fn squat_capsule_is_rejected() {
        let mut config = CharacterConfig::default();
        config.capsule.half_height = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CharacterConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn game_mode_defaults_to_blueprint_player() {
        assert_eq!(
            GameModeConfig::default().default_pawn_class,
            "/Game/Blueprint/BP_TwinBlastPlayer"
        );
    }
}
