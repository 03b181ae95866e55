//! # TwinBlast Core
//!
//! Gameplay core for a third-person shooter character.
//!
//! The heart of the crate is the [`AttackResolver`](attack::AttackResolver):
//! a two-state machine that arms when the attack animation starts and, when
//! that animation ends, fires exactly one forward hit-scan and reports the
//! outcome. Around it sit the pieces a character needs to drive it:
//!
//! - **Animation**: [`MontagePlayer`](animation::MontagePlayer) behind the
//!   [`AttackAnimator`](animation::AttackAnimator) trait
//! - **Character**: movement, controller, camera boom and input routing
//! - **Assets / game mode**: named montages and pawn classes, default pawn
//! - **Session**: collision world plus characters stepped on a fixed clock
//! - **Scenario**: JSON-described runs for headless testing
//!
//! Collision queries are answered by the [`hitscan`] crate.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec3;
//! use twinblast_core::input::InputEvent;
//! use twinblast_core::session::GameSession;
//!
//! let mut session = GameSession::new();
//! let player = session.spawn_player(Vec3::ZERO, 0.0).unwrap();
//! session.spawn_target_sphere(Vec3::new(500.0, 0.0, 0.0), 50.0).unwrap();
//!
//! session.dispatch_input(player, &InputEvent::fire_started()).unwrap();
//! let mut outcomes = Vec::new();
//! for _ in 0..120 {
//!     outcomes.extend(session.step(1.0 / 60.0));
//! }
//!
//! assert_eq!(outcomes.len(), 1);
//! assert!(outcomes[0].1.hit);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export hitscan for collision types
pub use hitscan;

pub mod animation;
pub mod assets;
pub mod attack;
pub mod character;
pub mod config;
pub mod error;
pub mod game_mode;
pub mod input;
pub mod math;
pub mod presentation;
pub mod scenario;
pub mod session;

#[cfg(test)]
mod tests;

pub use attack::{AttackResolver, AttackState, HitOutcome, ATTACK_RANGE};
pub use error::{ConfigError, SessionError};
