//! Attack resolution: one hit-scan per completed attack animation.
//!
//! The [`AttackResolver`] couples the attack animation to a single forward
//! trace. It has two states:
//!
//! ```text
//!          request_attack (animation started)
//!   Idle ───────────────────────────────────────▶ Armed
//!    ▲                                              │
//!    └──────────────────────────────────────────────┘
//!      on_attack_animation_ended  (one hit query)
//! ```
//!
//! # Invariants
//!
//! - At most one attack is in flight: requests while Armed are ignored and
//!   never reach the animator.
//! - Every Armed → Idle transition issues exactly one hit query, whether the
//!   animation completed or was interrupted.
//! - The attacker's own colliders are excluded from its hit query.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use hitscan::{ActorId, Collider, ColliderShape, CollisionChannels, CollisionWorld};
//! use twinblast_core::animation::{Montage, MontagePlayer};
//! use twinblast_core::attack::{AttackResolver, Attacker};
//! use twinblast_core::presentation::DebugDraw;
//!
//! let mut world = CollisionWorld::new();
//! world
//!     .insert(Collider::new(
//!         ActorId::new(2),
//!         ColliderShape::sphere(Vec3::new(500.0, 0.0, 0.0), 50.0),
//!         CollisionChannels::ATTACK,
//!     ))
//!     .unwrap();
//!
//! let mut animator = MontagePlayer::new(Some(Montage::new("fire", 0.5)));
//! let mut resolver = AttackResolver::new();
//! let mut draw = DebugDraw::new();
//! let attacker = Attacker::new(ActorId::new(1), Vec3::ZERO, Vec3::X);
//!
//! assert!(resolver.request_attack(&mut animator));
//! let outcome = resolver
//!     .on_attack_animation_ended(false, Some(&attacker), &world, &mut draw)
//!     .unwrap();
//!
//! assert!(outcome.hit);
//! assert!((outcome.point.unwrap().x - 450.0).abs() < 0.01);
//! ```

use glam::Vec3;
use hitscan::{ActorId, CollisionChannels, CollisionWorld, QueryParams, TraceHit};
use serde::{Deserialize, Serialize};

use crate::animation::AttackAnimator;
use crate::config::AttackConfig;
use crate::presentation::{Color, Presentation};

/// Length of the attack hit-scan in world units.
pub const ATTACK_RANGE: f32 = 10_000.0;

/// Colour of the debug line drawn for every resolved attack.
pub const ATTACK_TRACE_COLOR: Color = Color::GREEN;

/// Resolver state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackState {
    /// No attack in flight
    #[default]
    Idle,
    /// Attack animation playing, hit resolution pending
    Armed,
}

/// Where the attack comes from, sampled when the animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    /// Attacking actor, excluded from its own hit query
    pub actor: ActorId,
    /// World position the trace starts from
    pub location: Vec3,
    /// Facing direction of the trace
    pub forward: Vec3,
}

impl Attacker {
    /// Create an attacker sample.
    #[must_use]
    pub fn new(actor: ActorId, location: Vec3, forward: Vec3) -> Self {
        Self {
            actor,
            location,
            forward,
        }
    }
}

/// Result of one resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Whether something blocked the trace
    pub hit: bool,
    /// Impact point on a hit, trace end on a miss, `None` without an attacker
    pub point: Option<Vec3>,
    /// Actor that was hit
    pub target: Option<ActorId>,
}

impl HitOutcome {
    fn miss(point: Option<Vec3>) -> Self {
        Self {
            hit: false,
            point,
            target: None,
        }
    }
}

/// Physics collaborator answering the attack's segment query.
pub trait HitQuery {
    /// First blocking intersection along `start -> end` on `channel`.
    fn first_blocking_hit(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &QueryParams,
    ) -> Option<TraceHit>;
}

impl HitQuery for CollisionWorld {
    fn first_blocking_hit(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &QueryParams,
    ) -> Option<TraceHit> {
        self.line_trace_single(start, end, channel, params)
    }
}

/// Couples the attack animation to a single forward hit-scan.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackResolver {
    state: AttackState,
    range: f32,
    channel: CollisionChannels,
    resolved: u64,
}

impl Default for AttackResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackResolver {
    /// Resolver with the standard range on the attack channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AttackState::Idle,
            range: ATTACK_RANGE,
            channel: CollisionChannels::ATTACK,
            resolved: 0,
        }
    }

    /// Resolver using the range and channel from `config`.
    #[must_use]
    pub fn from_config(config: &AttackConfig) -> Self {
        Self {
            range: config.range,
            channel: config.trace_channel,
            ..Self::new()
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AttackState {
        self.state
    }

    /// True while an attack animation is in flight.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state == AttackState::Armed
    }

    /// Hit-scan length.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Number of attacks resolved so far.
    #[must_use]
    pub fn resolved_count(&self) -> u64 {
        self.resolved
    }

    /// Start an attack.
    ///
    /// Ignored while Armed. Otherwise asks `animator` to play the attack and
    /// arms on success. Returns true if this call armed the resolver.
    pub fn request_attack(&mut self, animator: &mut dyn AttackAnimator) -> bool {
        if self.is_armed() {
            tracing::debug!("attack already in flight, request ignored");
            return false;
        }
        if !animator.play_attack_animation() {
            tracing::warn!("attack animation could not start, staying idle");
            return false;
        }
        self.state = AttackState::Armed;
        tracing::debug!("attack armed");
        true
    }

    /// Handle the end of the attack animation.
    ///
    /// Disarms regardless of `interrupted`, then runs exactly one hit query
    /// from `attacker` along its forward vector and reports the result to
    /// `presentation`. Returns `None` if no attack was in flight.
    pub fn on_attack_animation_ended(
        &mut self,
        interrupted: bool,
        attacker: Option<&Attacker>,
        world: &dyn HitQuery,
        presentation: &mut dyn Presentation,
    ) -> Option<HitOutcome> {
        if !self.is_armed() {
            tracing::debug!(interrupted, "animation ended with no attack in flight");
            return None;
        }
        self.state = AttackState::Idle;
        self.resolved += 1;

        let Some(attacker) = attacker else {
            tracing::warn!(interrupted, "no attacking actor at resolution time");
            presentation.log_line("Not Hit");
            return Some(HitOutcome::miss(None));
        };

        let origin = attacker.location;
        let direction = attacker.forward.normalize_or_zero();
        let end = origin + direction * self.range;
        let params = QueryParams::new().with_ignored_actor(attacker.actor);

        let outcome = match world.first_blocking_hit(origin, end, self.channel, &params) {
            Some(hit) => {
                tracing::info!(
                    attacker = %attacker.actor,
                    target = %hit.actor,
                    distance = hit.distance,
                    interrupted,
                    "attack hit"
                );
                presentation.log_line("Hit");
                presentation.draw_debug_line(origin, hit.point, ATTACK_TRACE_COLOR);
                HitOutcome {
                    hit: true,
                    point: Some(hit.point),
                    target: Some(hit.actor),
                }
            }
            None => {
                tracing::info!(attacker = %attacker.actor, interrupted, "attack missed");
                presentation.log_line("Not Hit");
                presentation.draw_debug_line(origin, end, ATTACK_TRACE_COLOR);
                HitOutcome::miss(Some(end))
            }
        };
        Some(outcome)
    }
}
