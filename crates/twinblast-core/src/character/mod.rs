//! The player character.
//!
//! A [`PlayerCharacter`] owns its movement, camera boom, attack animator and
//! [`AttackResolver`]. Input arrives through [`handle_input`] (or the
//! direct operations it dispatches to), and [`tick`] advances everything one
//! frame:
//!
//! 1. movement integrates and the collision capsule follows the actor
//! 2. the animator advances and its end-of-animation messages are drained
//! 3. each message is handed to the resolver, which runs the hit query
//! 4. the camera boom is placed
//!
//! [`handle_input`]: PlayerCharacter::handle_input
//! [`tick`]: PlayerCharacter::tick

pub mod camera;
pub mod controller;
pub mod movement;

use std::fmt;

use glam::{Vec2, Vec3};
use hitscan::{
    ActorId, Collider, ColliderHandle, ColliderShape, CollisionChannels, CollisionWorld, WorldError,
};

use crate::animation::{AttackAnimator, MontagePlayer};
use crate::assets::AssetRegistry;
use crate::attack::{AttackResolver, Attacker, HitOutcome};
use crate::config::CharacterConfig;
use crate::input::{CharacterCommand, InputBindings, InputEvent};
use crate::math::Rotator;
use crate::presentation::Presentation;

pub use camera::{CameraBoom, CameraView};
pub use controller::PlayerController;
pub use movement::{CharacterMovement, MovementMode, MovementStep};

/// Channels the character capsule blocks.
pub const CAPSULE_BLOCKS: CollisionChannels = CollisionChannels::PAWN
    .union(CollisionChannels::VISIBILITY)
    .union(CollisionChannels::CAMERA)
    .union(CollisionChannels::ATTACK);

/// A third-person shooter character.
pub struct PlayerCharacter {
    id: ActorId,
    config: CharacterConfig,
    location: Vec3,
    rotation: Rotator,
    movement: CharacterMovement,
    controller: Option<PlayerController>,
    boom: CameraBoom,
    camera: CameraView,
    animator: Box<dyn AttackAnimator>,
    resolver: AttackResolver,
    bindings: InputBindings,
    capsule: Option<ColliderHandle>,
}

impl fmt::Debug for PlayerCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerCharacter")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("rotation", &self.rotation)
            .field("movement", &self.movement.mode())
            .field("resolver", &self.resolver.state())
            .field("possessed", &self.controller.is_some())
            .field("capsule", &self.capsule)
            .finish_non_exhaustive()
    }
}

impl PlayerCharacter {
    /// Create an unpossessed character standing at `location` facing `yaw`.
    ///
    /// `location` is the capsule center; its height becomes the ground plane.
    #[must_use]
    pub fn new(
        id: ActorId,
        config: CharacterConfig,
        animator: Box<dyn AttackAnimator>,
        location: Vec3,
        yaw: f32,
    ) -> Self {
        let rotation = Rotator::from_yaw(yaw).normalized();
        let boom = CameraBoom::new(config.camera);
        let camera = CameraView {
            location,
            rotation,
            arm_length: boom.target_arm_length(),
        };
        Self {
            id,
            movement: CharacterMovement::new(config.movement, location.z),
            resolver: AttackResolver::from_config(&config.attack),
            config,
            location,
            rotation,
            controller: None,
            boom,
            camera,
            animator,
            bindings: InputBindings::default_bindings(),
            capsule: None,
        }
    }

    /// Create a character whose attack montage comes from `registry`.
    #[must_use]
    pub fn from_registry(
        id: ActorId,
        config: CharacterConfig,
        registry: &AssetRegistry,
        location: Vec3,
        yaw: f32,
    ) -> Self {
        let animator = MontagePlayer::from_registry(registry, &config.attack.montage);
        Self::new(id, config, Box::new(animator), location, yaw)
    }

    /// Actor id.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Configuration the character was built with.
    #[must_use]
    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// Capsule center.
    #[must_use]
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Actor rotation (yaw only).
    #[must_use]
    pub fn rotation(&self) -> Rotator {
        self.rotation
    }

    /// Actor forward vector.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }

    /// Movement component.
    #[must_use]
    pub fn movement(&self) -> &CharacterMovement {
        &self.movement
    }

    /// Possessing controller.
    #[must_use]
    pub fn controller(&self) -> Option<&PlayerController> {
        self.controller.as_ref()
    }

    /// Camera placement from the last tick.
    #[must_use]
    pub fn camera(&self) -> &CameraView {
        &self.camera
    }

    /// Attack resolver.
    #[must_use]
    pub fn resolver(&self) -> &AttackResolver {
        &self.resolver
    }

    /// Attack animator.
    #[must_use]
    pub fn animator(&self) -> &dyn AttackAnimator {
        self.animator.as_ref()
    }

    /// Input bindings.
    #[must_use]
    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    /// Mutable input bindings, for rebinding.
    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    /// True once the capsule is in a world.
    #[must_use]
    pub fn is_spawned(&self) -> bool {
        self.capsule.is_some()
    }

    /// Put the collision capsule into `world`.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the capsule dimensions are invalid.
    pub fn spawn_into(&mut self, world: &mut CollisionWorld) -> Result<ColliderHandle, WorldError> {
        if let Some(handle) = self.capsule {
            return Ok(handle);
        }
        let shape = ColliderShape::upright_capsule(
            self.location,
            self.config.capsule.radius,
            self.config.capsule.half_height,
        );
        let handle = world.insert(Collider::new(self.id, shape, CAPSULE_BLOCKS))?;
        self.capsule = Some(handle);
        tracing::info!(actor = %self.id, location = %self.location, "character spawned");
        Ok(handle)
    }

    /// Remove the character's colliders from `world`.
    pub fn despawn_from(&mut self, world: &mut CollisionWorld) -> usize {
        self.capsule = None;
        let removed = world.remove_actor(self.id);
        tracing::info!(actor = %self.id, "character despawned");
        removed
    }

    /// Snapshot used by the resolver; `None` until spawned.
    #[must_use]
    pub fn attacker(&self) -> Option<Attacker> {
        self.capsule
            .map(|_| Attacker::new(self.id, self.location, self.forward()))
    }

    /// Take control with `controller`.
    pub fn possess(&mut self, controller: PlayerController) {
        self.controller = Some(controller);
        tracing::debug!(actor = %self.id, "possessed");
    }

    /// Release the controller.
    pub fn unpossess(&mut self) -> Option<PlayerController> {
        tracing::debug!(actor = %self.id, "unpossessed");
        self.controller.take()
    }

    /// Move relative to the control yaw: `y` forward, `x` right.
    pub fn move_input(&mut self, axis: Vec2) {
        let Some(controller) = &self.controller else {
            return;
        };
        let heading = controller.control_rotation().yaw_only();
        self.movement.add_input_vector(heading.forward() * axis.y);
        self.movement.add_input_vector(heading.right() * axis.x);
    }

    /// Turn the control rotation: `x` yaw, `y` pitch.
    pub fn look(&mut self, axis: Vec2) {
        let Some(controller) = &mut self.controller else {
            return;
        };
        controller.add_yaw_input(axis.x);
        controller.add_pitch_input(axis.y);
    }

    /// Request an attack. Returns true if an attack started.
    pub fn fire(&mut self) -> bool {
        self.resolver.request_attack(self.animator.as_mut())
    }

    /// Release fire. The attack in flight still resolves.
    pub fn stop_fire(&mut self) {
        tracing::trace!(actor = %self.id, "fire released");
    }

    /// Start a jump.
    pub fn jump(&mut self) {
        self.movement.jump();
    }

    /// Release jump.
    pub fn stop_jumping(&mut self) {
        self.movement.stop_jumping();
    }

    /// Cut the attack animation short.
    ///
    /// The interrupted end is delivered to the resolver on the next tick.
    pub fn interrupt_attack(&mut self) {
        self.animator.interrupt();
    }

    /// Route an input event through the bindings.
    ///
    /// Returns the command that ran, or `None` for unbound input.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<CharacterCommand> {
        let command = self.bindings.resolve(event)?;
        match command {
            CharacterCommand::Jump => self.jump(),
            CharacterCommand::StopJumping => self.stop_jumping(),
            CharacterCommand::Move => self.move_input(event.axis2d()),
            CharacterCommand::Look => self.look(event.axis2d()),
            CharacterCommand::Fire => {
                self.fire();
            }
            CharacterCommand::StopFire => self.stop_fire(),
        }
        Some(command)
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Returns the outcome of every attack resolved this frame.
    pub fn tick(
        &mut self,
        dt: f32,
        world: &mut CollisionWorld,
        presentation: &mut dyn Presentation,
    ) -> Vec<HitOutcome> {
        let step = self.movement.step(dt, self.location, self.rotation.yaw);
        let offset = step.location - self.location;
        if self.capsule.is_some() && offset != Vec3::ZERO {
            world.translate_actor(self.id, offset);
        }
        self.location = step.location;
        self.rotation = Rotator::from_yaw(step.yaw);

        self.animator.update(dt);
        let mut outcomes = Vec::new();
        for ended in self.animator.take_ended() {
            let attacker = self.attacker();
            if let Some(outcome) = self.resolver.on_attack_animation_ended(
                ended.interrupted,
                attacker.as_ref(),
                &*world,
                presentation,
            ) {
                outcomes.push(outcome);
            }
        }

        let control = self.controller.map(|c| c.control_rotation());
        self.camera = self
            .boom
            .update(self.id, self.location, control, self.rotation, world);

        outcomes
    }
}
