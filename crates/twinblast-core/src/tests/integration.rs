//! End-to-end tests: input through animation to hit-scan and presentation.

use glam::{Vec2, Vec3};
use hitscan::ActorId;

use crate::attack::AttackState;
use crate::character::PlayerCharacter;
use crate::config::{CharacterConfig, GameModeConfig};
use crate::assets::AssetRegistry;
use crate::input::InputEvent;
use crate::presentation::Color;
use crate::session::GameSession;

use super::helpers::{fire_and_resolve, setup_shooting_range, step_seconds, ScriptedAnimator, DT};

// =============================================================================
// Hit Resolution
// =============================================================================

#[test]
fn sphere_ahead_is_hit_at_its_surface() {
    let mut session = GameSession::new();
    let (player, target) = setup_shooting_range(&mut session);

    let outcomes = fire_and_resolve(&mut session, player);

    assert_eq!(outcomes.len(), 1);
    let (actor, outcome) = outcomes[0];
    assert_eq!(actor, player);
    assert!(outcome.hit);
    assert_eq!(outcome.target, Some(target));
    assert!((outcome.point.unwrap() - Vec3::new(450.0, 0.0, 0.0)).length() < 0.01);

    let draw = session.debug_draw();
    assert_eq!(draw.log(), ["Hit".to_string()]);
    assert_eq!(draw.lines().len(), 1);
    assert_eq!(draw.lines()[0].color, Color::GREEN);
}

#[test]
fn empty_world_misses_at_full_range() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();

    let outcomes = fire_and_resolve(&mut session, player);

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].1.hit);
    assert_eq!(outcomes[0].1.point, Some(Vec3::new(10_000.0, 0.0, 0.0)));
    assert_eq!(session.debug_draw().log(), ["Not Hit".to_string()]);
    assert_eq!(
        session.debug_draw().lines()[0].end,
        Vec3::new(10_000.0, 0.0, 0.0)
    );
}

#[test]
fn target_behind_is_missed() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    session
        .spawn_target_sphere(Vec3::new(-500.0, 0.0, 0.0), 50.0)
        .unwrap();

    let outcomes = fire_and_resolve(&mut session, player);
    assert!(!outcomes[0].1.hit);
}

#[test]
fn nearest_of_two_targets_wins() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    session
        .spawn_target_sphere(Vec3::new(900.0, 0.0, 0.0), 50.0)
        .unwrap();
    let near = session
        .spawn_target_box(Vec3::new(300.0, -50.0, -50.0), Vec3::new(320.0, 50.0, 50.0))
        .unwrap();

    let outcomes = fire_and_resolve(&mut session, player);
    assert_eq!(outcomes[0].1.target, Some(near));
    assert!((outcomes[0].1.point.unwrap().x - 300.0).abs() < 0.01);
}

#[test]
fn spawn_yaw_aims_the_attack() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 90.0).unwrap();
    let target = session
        .spawn_target_sphere(Vec3::new(0.0, 500.0, 0.0), 50.0)
        .unwrap();

    let outcomes = fire_and_resolve(&mut session, player);
    assert_eq!(outcomes[0].1.target, Some(target));
}

#[test]
fn other_player_can_be_hit() {
    let mut session = GameSession::new();
    let shooter = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    let victim = session.spawn_player(Vec3::new(800.0, 0.0, 0.0), 180.0).unwrap();

    let outcomes = fire_and_resolve(&mut session, shooter);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].1.target, Some(victim));
    // Capsule radius 42
    assert!((outcomes[0].1.point.unwrap().x - 758.0).abs() < 0.01);
}

// =============================================================================
// Attack Gating
// =============================================================================

#[test]
fn repeated_fire_during_animation_resolves_once() {
    let mut session = GameSession::new();
    let (player, _) = setup_shooting_range(&mut session);

    session.dispatch_input(player, &InputEvent::fire_started()).unwrap();
    let mut outcomes = Vec::new();
    for _ in 0..10 {
        outcomes.extend(session.step(DT));
        session.dispatch_input(player, &InputEvent::fire_started()).unwrap();
        session.dispatch_input(player, &InputEvent::fire_completed()).unwrap();
    }
    // Montage is still playing; the re-presses above were ignored
    let character = session.character(player).unwrap();
    assert_eq!(character.resolver().state(), AttackState::Armed);

    outcomes.extend(step_seconds(&mut session, 0.5));
    assert_eq!(outcomes.len(), 1);
}

#[test]
fn back_to_back_attacks_each_resolve() {
    let mut session = GameSession::new();
    let (player, _) = setup_shooting_range(&mut session);

    let mut total = 0;
    for _ in 0..3 {
        total += fire_and_resolve(&mut session, player).len();
    }
    assert_eq!(total, 3);
    assert_eq!(session.debug_draw().lines().len(), 3);
}

#[test]
fn interrupted_attack_still_hits() {
    let mut session = GameSession::new();
    let (player, target) = setup_shooting_range(&mut session);

    session.dispatch_input(player, &InputEvent::fire_started()).unwrap();
    session.step(DT);
    session.interrupt_attack(player).unwrap();
    let outcomes = session.step(DT);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].1.target, Some(target));
    assert!(step_seconds(&mut session, 1.0).is_empty());
}

#[test]
fn missing_fire_montage_keeps_player_idle() {
    let mut registry = AssetRegistry::new();
    registry.register_pawn_class(crate::assets::DEFAULT_PAWN_CLASS, CharacterConfig::default());
    let mut session = GameSession::with_assets(registry, GameModeConfig::default());
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();

    for _ in 0..5 {
        session.dispatch_input(player, &InputEvent::fire_started()).unwrap();
        assert!(session.step(DT).is_empty());
    }
    assert_eq!(
        session.character(player).unwrap().resolver().state(),
        AttackState::Idle
    );
}

#[test]
fn custom_animator_end_is_forwarded() {
    let mut session = GameSession::new();
    session
        .spawn_target_sphere(Vec3::new(500.0, 0.0, 0.0), 50.0)
        .unwrap();
    let character = PlayerCharacter::new(
        ActorId::new(100),
        CharacterConfig::default(),
        Box::new(ScriptedAnimator::available()),
        Vec3::ZERO,
        0.0,
    );
    let id = session.add_character(character).unwrap();

    session.character_mut(id).unwrap().fire();
    // Scripted animator never ends on its own
    assert!(step_seconds(&mut session, 2.0).is_empty());

    session.interrupt_attack(id).unwrap();
    let outcomes = session.step(DT);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].1.hit);
}

// =============================================================================
// Movement and Camera
// =============================================================================

#[test]
fn walking_changes_where_the_attack_comes_from() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    let target = session
        .spawn_target_sphere(Vec3::new(0.0, 2000.0, 0.0), 50.0)
        .unwrap();

    // Strafe right (+Y at yaw 0) long enough to turn and face +Y
    for _ in 0..60 {
        session
            .dispatch_input(player, &InputEvent::move_axis(Vec2::new(1.0, 0.0)))
            .unwrap();
        session.step(DT);
    }
    let character = session.character(player).unwrap();
    assert!(character.location().y > 0.0);
    assert!((character.rotation().yaw - 90.0).abs() < 1e-3);

    let outcomes = fire_and_resolve(&mut session, player);
    assert_eq!(outcomes[0].1.target, Some(target));
}

#[test]
fn jump_returns_to_spawn_height() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::new(0.0, 0.0, 96.0), 0.0).unwrap();

    session.dispatch_input(player, &InputEvent::jump_started()).unwrap();
    session.step(DT);
    assert!(session.character(player).unwrap().location().z > 96.0);
    session.dispatch_input(player, &InputEvent::jump_completed()).unwrap();

    step_seconds(&mut session, 2.0);
    assert_eq!(session.character(player).unwrap().location().z, 96.0);
}

#[test]
fn camera_boom_shortens_against_wall() {
    let mut session = GameSession::new();
    let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
    session
        .spawn_target_box(Vec3::new(-210.0, -300.0, -300.0), Vec3::new(-200.0, 300.0, 300.0))
        .unwrap();

    session.step(DT);
    let camera = *session.character(player).unwrap().camera();
    assert!((camera.arm_length - 200.0).abs() < 0.01);

    // Look the other way: nothing behind
    session
        .dispatch_input(player, &InputEvent::look(Vec2::new(180.0, 0.0)))
        .unwrap();
    session.step(DT);
    assert_eq!(session.character(player).unwrap().camera().arm_length, 400.0);
}
