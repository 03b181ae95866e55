//! Named assets: attack montages and pawn classes.
//!
//! Assets are looked up by their content path. A lookup that finds nothing
//! returns `None`; callers decide whether that is a warning or a fallback.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::Montage;
use crate::config::{read_json, CharacterConfig};
use crate::error::ConfigError;

/// Pawn class spawned for players unless the game mode says otherwise.
pub const DEFAULT_PAWN_CLASS: &str = "/Game/Blueprint/BP_TwinBlastPlayer";

/// The primary fire montage.
pub const FIRE_MONTAGE_PATH: &str =
    "/Game/ParagonTwinblast/Characters/Heroes/TwinBlast/Animations/Primary_Fire_Med_A_Montage";

/// Length of the built-in fire montage in seconds.
pub const FIRE_MONTAGE_DURATION: f32 = 0.6;

/// Lookup table for montages and pawn classes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRegistry {
    montages: BTreeMap<String, Montage>,
    pawn_classes: BTreeMap<String, CharacterConfig>,
}

impl AssetRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the fire montage and the default player pawn.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_montage(
            FIRE_MONTAGE_PATH,
            Montage::new("Primary_Fire_Med_A_Montage", FIRE_MONTAGE_DURATION),
        );
        registry.register_pawn_class(DEFAULT_PAWN_CLASS, CharacterConfig::default());
        registry
    }

    /// Parse a registry from JSON.
    ///
    /// Pawn classes are validated as they would be when loaded on their own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or
    /// [`ConfigError::Invalid`] for a bad montage or pawn class.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let registry: Self = serde_json::from_str(json)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a registry file.
    ///
    /// # Errors
    ///
    /// As [`from_json_str`](Self::from_json_str), plus [`ConfigError::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let registry: Self = read_json(path.as_ref())?;
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (path, montage) in &self.montages {
            if !(montage.duration.is_finite() && montage.duration > 0.0) {
                return Err(ConfigError::invalid(
                    "montages.duration",
                    format!("{path}: {} must be positive", montage.duration),
                ));
            }
        }
        self.pawn_classes.values().try_for_each(CharacterConfig::validate)
    }

    /// Register (or replace) a montage under `path`.
    pub fn register_montage(&mut self, path: impl Into<String>, montage: Montage) {
        self.montages.insert(path.into(), montage);
    }

    /// Register (or replace) a pawn class under `path`.
    pub fn register_pawn_class(&mut self, path: impl Into<String>, config: CharacterConfig) {
        self.pawn_classes.insert(path.into(), config);
    }

    /// Montage registered at `path`.
    #[must_use]
    pub fn find_montage(&self, path: &str) -> Option<&Montage> {
        self.montages.get(path)
    }

    /// Pawn class registered at `path`.
    #[must_use]
    pub fn find_pawn_class(&self, path: &str) -> Option<&CharacterConfig> {
        self.pawn_classes.get(path)
    }
}
