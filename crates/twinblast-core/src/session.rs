//! Game session: one collision world, its characters and static targets.
//!
//! Characters tick in actor-id order, so a session driven by the same
//! inputs produces the same outcomes every run.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use hitscan::{
    scatter_spheres, ActorId, Collider, ColliderShape, CollisionChannels, CollisionWorld,
    ScatterSpec,
};

use crate::assets::AssetRegistry;
use crate::attack::HitOutcome;
use crate::character::PlayerCharacter;
use crate::config::GameModeConfig;
use crate::error::SessionError;
use crate::game_mode::GameMode;
use crate::input::{CharacterCommand, InputEvent};
use crate::presentation::DebugDraw;

/// Channels static targets block.
pub const TARGET_BLOCKS: CollisionChannels = CollisionChannels::SOLID;

/// A running game session.
#[derive(Debug)]
pub struct GameSession {
    world: CollisionWorld,
    registry: AssetRegistry,
    game_mode: GameMode,
    characters: BTreeMap<ActorId, PlayerCharacter>,
    targets: BTreeSet<ActorId>,
    draw: DebugDraw,
    next_actor: u64,
    time: f64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Session using the default assets and game mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_assets(AssetRegistry::with_defaults(), GameModeConfig::default())
    }

    /// Session with custom assets and game mode config.
    #[must_use]
    pub fn with_assets(registry: AssetRegistry, config: GameModeConfig) -> Self {
        let game_mode = GameMode::new(config, &registry);
        Self {
            world: CollisionWorld::new(),
            registry,
            game_mode,
            characters: BTreeMap::new(),
            targets: BTreeSet::new(),
            draw: DebugDraw::new(),
            next_actor: 1,
            time: 0.0,
        }
    }

    fn allocate_actor(&mut self) -> ActorId {
        let id = ActorId::new(self.next_actor);
        self.next_actor += 1;
        id
    }

    /// Spawn the game mode's default pawn.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] if the pawn's capsule is malformed.
    pub fn spawn_player(&mut self, location: Vec3, yaw: f32) -> Result<ActorId, SessionError> {
        let id = self.allocate_actor();
        let mut character = self
            .game_mode
            .spawn_default_pawn(id, &self.registry, location, yaw);
        character.spawn_into(&mut self.world)?;
        self.characters.insert(id, character);
        Ok(id)
    }

    /// Add an already-built character and spawn it into the world.
    ///
    /// The character keeps its own id; any existing actor with that id is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] if the capsule is malformed.
    pub fn add_character(
        &mut self,
        mut character: PlayerCharacter,
    ) -> Result<ActorId, SessionError> {
        let id = character.id();
        if self.contains(id) {
            self.despawn(id)?;
        }
        character.spawn_into(&mut self.world)?;
        self.next_actor = self.next_actor.max(id.as_u64() + 1);
        self.characters.insert(id, character);
        Ok(id)
    }

    fn spawn_target(&mut self, shape: ColliderShape) -> Result<ActorId, SessionError> {
        let id = self.allocate_actor();
        self.world.insert(Collider::new(id, shape, TARGET_BLOCKS))?;
        self.targets.insert(id);
        tracing::debug!(actor = %id, center = %shape.center(), "target spawned");
        Ok(id)
    }

    /// Spawn a static sphere target.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] for a non-positive or non-finite radius.
    pub fn spawn_target_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
    ) -> Result<ActorId, SessionError> {
        self.spawn_target(ColliderShape::sphere(center, radius))
    }

    /// Spawn a static box target.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] for inverted or non-finite corners.
    pub fn spawn_target_box(&mut self, min: Vec3, max: Vec3) -> Result<ActorId, SessionError> {
        self.spawn_target(ColliderShape::box_min_max(min, max))
    }

    /// Spawn deterministically scattered sphere targets.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] for an invalid scatter spec.
    pub fn spawn_scattered_targets(
        &mut self,
        seed: u64,
        spec: &ScatterSpec,
    ) -> Result<Vec<ActorId>, SessionError> {
        scatter_spheres(seed, spec)?
            .into_iter()
            .map(|shape| self.spawn_target(shape))
            .collect()
    }

    /// Remove an actor and its colliders.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownActor`] if no such actor exists.
    pub fn despawn(&mut self, id: ActorId) -> Result<(), SessionError> {
        if let Some(mut character) = self.characters.remove(&id) {
            character.despawn_from(&mut self.world);
            return Ok(());
        }
        if self.targets.remove(&id) {
            self.world.remove_actor(id);
            return Ok(());
        }
        Err(SessionError::UnknownActor(id))
    }

    /// True if an actor with this id exists.
    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.characters.contains_key(&id) || self.targets.contains(&id)
    }

    fn character_or_err(&mut self, id: ActorId) -> Result<&mut PlayerCharacter, SessionError> {
        if self.targets.contains(&id) {
            return Err(SessionError::NotACharacter(id));
        }
        self.characters
            .get_mut(&id)
            .ok_or(SessionError::UnknownActor(id))
    }

    /// Deliver an input event to a character.
    ///
    /// Returns the command the event triggered, `None` if it was unbound.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownActor`] or [`SessionError::NotACharacter`].
    pub fn dispatch_input(
        &mut self,
        id: ActorId,
        event: &InputEvent,
    ) -> Result<Option<CharacterCommand>, SessionError> {
        Ok(self.character_or_err(id)?.handle_input(event))
    }

    /// Cut a character's attack animation short.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownActor`] or [`SessionError::NotACharacter`].
    pub fn interrupt_attack(&mut self, id: ActorId) -> Result<(), SessionError> {
        self.character_or_err(id)?.interrupt_attack();
        Ok(())
    }

    /// Advance every character by `dt` seconds.
    ///
    /// Returns the attacks resolved this step, in actor order.
    pub fn step(&mut self, dt: f32) -> Vec<(ActorId, HitOutcome)> {
        let mut resolved = Vec::new();
        for (id, character) in &mut self.characters {
            for outcome in character.tick(dt, &mut self.world, &mut self.draw) {
                resolved.push((*id, outcome));
            }
        }
        self.time += f64::from(dt);
        resolved
    }

    /// Seconds simulated so far.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The collision world.
    #[must_use]
    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// The asset registry.
    #[must_use]
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// The game mode.
    #[must_use]
    pub fn game_mode(&self) -> &GameMode {
        &self.game_mode
    }

    /// A character by id.
    #[must_use]
    pub fn character(&self, id: ActorId) -> Option<&PlayerCharacter> {
        self.characters.get(&id)
    }

    /// A character by id, telling targets apart from missing actors.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotACharacter`] for a static target and
    /// [`SessionError::UnknownActor`] otherwise.
    pub fn try_character(&self, id: ActorId) -> Result<&PlayerCharacter, SessionError> {
        if self.targets.contains(&id) {
            return Err(SessionError::NotACharacter(id));
        }
        self.characters.get(&id).ok_or(SessionError::UnknownActor(id))
    }

    /// Mutable character by id.
    pub fn character_mut(&mut self, id: ActorId) -> Option<&mut PlayerCharacter> {
        self.characters.get_mut(&id)
    }

    /// Characters in actor order.
    pub fn characters(&self) -> impl Iterator<Item = &PlayerCharacter> {
        self.characters.values()
    }

    /// Static targets in actor order.
    pub fn targets(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.targets.iter().copied()
    }

    /// Debug lines and log recorded so far.
    #[must_use]
    pub fn debug_draw(&self) -> &DebugDraw {
        &self.draw
    }

    /// Mutable debug-draw buffer, for draining.
    pub fn debug_draw_mut(&mut self) -> &mut DebugDraw {
        &mut self.draw
    }
}
