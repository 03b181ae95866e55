//! Game mode: decides which pawn players get.

use glam::Vec3;
use hitscan::ActorId;

use crate::assets::AssetRegistry;
use crate::character::{PlayerCharacter, PlayerController};
use crate::config::{CharacterConfig, GameModeConfig};

/// Resolved game mode.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMode {
    config: GameModeConfig,
    default_pawn: CharacterConfig,
    pawn_class_found: bool,
}

impl Default for GameMode {
    fn default() -> Self {
        Self::new(GameModeConfig::default(), &AssetRegistry::with_defaults())
    }
}

impl GameMode {
    /// Resolve the default pawn class against `registry`.
    ///
    /// An unregistered pawn class falls back to the built-in character.
    #[must_use]
    pub fn new(config: GameModeConfig, registry: &AssetRegistry) -> Self {
        let found = registry.find_pawn_class(&config.default_pawn_class).cloned();
        let pawn_class_found = found.is_some();
        if !pawn_class_found {
            tracing::warn!(
                pawn_class = %config.default_pawn_class,
                "default pawn class not found, using built-in character"
            );
        }
        Self {
            default_pawn: found.unwrap_or_default(),
            config,
            pawn_class_found,
        }
    }

    /// Configured pawn class path.
    #[must_use]
    pub fn default_pawn_class(&self) -> &str {
        &self.config.default_pawn_class
    }

    /// Whether the configured pawn class was registered.
    #[must_use]
    pub fn pawn_class_found(&self) -> bool {
        self.pawn_class_found
    }

    /// Character config players are spawned with.
    #[must_use]
    pub fn default_pawn(&self) -> &CharacterConfig {
        &self.default_pawn
    }

    /// Build a possessed default pawn. The caller spawns it into a world.
    #[must_use]
    pub fn spawn_default_pawn(
        &self,
        id: ActorId,
        registry: &AssetRegistry,
        location: Vec3,
        yaw: f32,
    ) -> PlayerCharacter {
        let mut character =
            PlayerCharacter::from_registry(id, self.default_pawn.clone(), registry, location, yaw);
        character.possess(PlayerController::facing(&self.default_pawn.camera, yaw));
        character
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_pawn_class_is_used() {
        let mut registry = AssetRegistry::with_defaults();
        let mut fast = CharacterConfig::default();
        fast.movement.max_walk_speed = 900.0;
        registry.register_pawn_class("/Game/Fast", fast);

        let mode = GameMode::new(
            GameModeConfig {
                default_pawn_class: "/Game/Fast".to_string(),
            },
            &registry,
        );
        assert!(mode.pawn_class_found());
        assert_eq!(mode.default_pawn().movement.max_walk_speed, 900.0);
    }

    #[test]
    fn missing_pawn_class_falls_back() {
        let mode = GameMode::new(GameModeConfig::default(), &AssetRegistry::new());
        assert!(!mode.pawn_class_found());
        assert_eq!(mode.default_pawn(), &CharacterConfig::default());
    }

    #[test]
    fn default_pawn_is_possessed_facing_spawn_yaw() {
        let registry = AssetRegistry::with_defaults();
        let mode = GameMode::new(GameModeConfig::default(), &registry);
        let pawn = mode.spawn_default_pawn(ActorId::new(1), &registry, Vec3::ZERO, 90.0);
        let controller = pawn.controller().unwrap();
        assert!((controller.control_rotation().yaw - 90.0).abs() < 1e-4);
        assert!(!pawn.is_spawned());
    }
}
