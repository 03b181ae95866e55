//! Test helper functions and test doubles.

use std::cell::Cell;

use glam::Vec3;
use hitscan::{ActorId, CollisionChannels, CollisionWorld, QueryParams, TraceHit};

use crate::animation::{AttackAnimator, MontageEnded};
use crate::attack::{HitOutcome, HitQuery};
use crate::input::InputEvent;
use crate::session::GameSession;

/// Fixed step used by session tests.
pub const DT: f32 = 1.0 / 60.0;

// =============================================================================
// Session Setup
// =============================================================================

/// Player at the origin facing +X with a sphere target of radius 50 at (500, 0, 0).
///
/// # Returns
///
/// A tuple of (player_id, target_id).
pub fn setup_shooting_range(session: &mut GameSession) -> (ActorId, ActorId) {
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    let target = session
        .spawn_target_sphere(Vec3::new(500.0, 0.0, 0.0), 50.0)
        .unwrap();
    (player, target)
}

/// Step `session` for `seconds` at [`DT`], collecting every outcome.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn step_seconds(session: &mut GameSession, seconds: f32) -> Vec<(ActorId, HitOutcome)> {
    let frames = (seconds / DT).round() as usize;
    let mut outcomes = Vec::new();
    for _ in 0..frames {
        outcomes.extend(session.step(DT));
    }
    outcomes
}

/// Press fire for `player` and run until the montage has surely ended.
pub fn fire_and_resolve(session: &mut GameSession, player: ActorId) -> Vec<(ActorId, HitOutcome)> {
    session
        .dispatch_input(player, &InputEvent::fire_started())
        .unwrap();
    step_seconds(session, 1.0)
}

// =============================================================================
// Test Doubles
// =============================================================================

/// Animator whose attack ends only when the test says so.
#[derive(Debug, Default)]
pub struct ScriptedAnimator {
    /// Whether play requests succeed
    pub available: bool,
    /// Calls to `play_attack_animation` that started playback
    pub plays: u32,
    playing: bool,
    ended: Vec<MontageEnded>,
}

impl ScriptedAnimator {
    /// Animator that can play.
    pub fn available() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    /// End the current playback, if any.
    pub fn end(&mut self, interrupted: bool) {
        if self.playing {
            self.playing = false;
            self.ended.push(MontageEnded {
                montage: "scripted".to_string(),
                interrupted,
            });
        }
    }
}

impl AttackAnimator for ScriptedAnimator {
    fn play_attack_animation(&mut self) -> bool {
        if !self.available {
            return false;
        }
        if !self.playing {
            self.playing = true;
            self.plays += 1;
        }
        true
    }

    fn is_attack_playing(&self) -> bool {
        self.playing
    }

    fn update(&mut self, _dt: f32) {}

    fn interrupt(&mut self) {
        self.end(true);
    }

    fn take_ended(&mut self) -> Vec<MontageEnded> {
        std::mem::take(&mut self.ended)
    }
}

/// [`HitQuery`] that counts calls and records the last ignored set.
pub struct CountingQuery<'a> {
    /// World answering the queries
    pub world: &'a CollisionWorld,
    /// Number of queries issued
    pub calls: Cell<u32>,
    /// Ignored actors of the last query
    pub last_ignored: Cell<Option<ActorId>>,
}

impl<'a> CountingQuery<'a> {
    /// Wrap `world`.
    pub fn new(world: &'a CollisionWorld) -> Self {
        Self {
            world,
            calls: Cell::new(0),
            last_ignored: Cell::new(None),
        }
    }
}

impl HitQuery for CountingQuery<'_> {
    fn first_blocking_hit(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &QueryParams,
    ) -> Option<TraceHit> {
        self.calls.set(self.calls.get() + 1);
        self.last_ignored.set(params.ignored_actors().next());
        self.world.line_trace_single(start, end, channel, params)
    }
}
