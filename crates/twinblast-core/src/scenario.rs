//! Headless scenario runs described in JSON.
//!
//! A scenario spawns one player and a set of targets, plays a timed input
//! script on a fixed timestep and records every resolved attack.
//!
//! ```json
//! {
//!   "duration": 2.0,
//!   "targets": [{ "shape": "sphere", "center": [500, 0, 0], "radius": 50 }],
//!   "script": [{ "at": 0.0, "input": { "kind": "fire" } }]
//! }
//! ```

use std::path::Path;

use glam::{Vec2, Vec3};
use hitscan::{ActorId, ScatterSpec};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetRegistry, DEFAULT_PAWN_CLASS};
use crate::attack::HitOutcome;
use crate::config::{read_json, CharacterConfig, GameModeConfig};
use crate::error::{ConfigError, SessionError};
use crate::input::InputEvent;
use crate::presentation::DebugLine;
use crate::session::GameSession;

fn default_timestep() -> f32 {
    1.0 / 60.0
}

/// Most fixed steps a single run may take.
pub const MAX_STEPS: usize = 10_000_000;

/// Where the player starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpawn {
    /// Capsule center
    pub location: Vec3,
    /// Initial heading in degrees
    pub yaw: f32,
}

/// An explicitly placed target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TargetSpec {
    /// Sphere target
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box target
    Box {
        /// Minimum corner
        min: Vec3,
        /// Maximum corner
        max: Vec3,
    },
}

/// Seeded scatter of sphere targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterTargets {
    /// RNG seed
    pub seed: u64,
    /// Placement parameters
    #[serde(flatten)]
    pub spec: ScatterSpec,
}

/// Input the script can deliver to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedInput {
    /// Fire pressed
    Fire,
    /// Fire released
    StopFire,
    /// Jump pressed
    Jump,
    /// Jump released
    StopJumping,
    /// Movement axis for one frame
    Move {
        /// `x` right, `y` forward
        axis: Vec2,
    },
    /// Look axis for one frame
    Look {
        /// `x` yaw, `y` pitch
        axis: Vec2,
    },
    /// Cut the attack animation short
    Interrupt,
}

/// One scripted input and when it happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Simulation time in seconds
    pub at: f32,
    /// What happens
    pub input: ScriptedInput,
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Fixed step length in seconds
    #[serde(default = "default_timestep")]
    pub timestep: f32,
    /// Total simulated time in seconds
    pub duration: f32,
    /// Player spawn
    #[serde(default)]
    pub player: PlayerSpawn,
    /// Player character tuning, replacing the default pawn class
    #[serde(default)]
    pub character: Option<CharacterConfig>,
    /// Explicit targets
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    /// Scattered targets
    #[serde(default)]
    pub scatter: Option<ScatterTargets>,
    /// Timed input script
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

impl Scenario {
    /// Parse and validate a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load and validate a scenario file.
    ///
    /// # Errors
    ///
    /// As [`from_json_str`](Self::from_json_str), plus [`ConfigError::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let scenario: Self = read_json(path.as_ref())?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check timing values and the character config.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::invalid(
                "timestep",
                format!("{} must be positive", self.timestep),
            ));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigError::invalid(
                "duration",
                format!("{} must not be negative", self.duration),
            ));
        }
        if self.raw_step_count() > MAX_STEPS as f64 {
            return Err(ConfigError::invalid(
                "duration",
                format!(
                    "{} s at {} s per step exceeds {MAX_STEPS} steps",
                    self.duration, self.timestep
                ),
            ));
        }
        if let Some(step) = self.script.iter().find(|s| !(s.at.is_finite() && s.at >= 0.0)) {
            return Err(ConfigError::invalid(
                "script.at",
                format!("{} must not be negative", step.at),
            ));
        }
        if let Some(character) = &self.character {
            character.validate()?;
        }
        Ok(())
    }

    fn raw_step_count(&self) -> f64 {
        (f64::from(self.duration) / f64::from(self.timestep)).ceil()
    }

    /// Number of fixed steps the run takes, at most [`MAX_STEPS`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_count(&self) -> usize {
        (self.raw_step_count() as usize).min(MAX_STEPS)
    }
}

/// An attack outcome with the time it resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedOutcome {
    /// Simulation time at the end of the resolving step
    pub time: f64,
    /// Attacking actor
    pub actor: ActorId,
    /// What happened
    pub outcome: HitOutcome,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Steps simulated
    pub steps: usize,
    /// The player
    pub player: ActorId,
    /// Resolved attacks in order
    pub outcomes: Vec<TimedOutcome>,
    /// Debug lines drawn
    pub debug_lines: Vec<DebugLine>,
    /// Presentation log
    pub log: Vec<String>,
    /// Player location after the last step
    pub final_location: Vec3,
}

impl ScenarioReport {
    /// Number of outcomes that hit something.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.hit).count()
    }
}

fn to_event(input: ScriptedInput) -> Option<InputEvent> {
    match input {
        ScriptedInput::Fire => Some(InputEvent::fire_started()),
        ScriptedInput::StopFire => Some(InputEvent::fire_completed()),
        ScriptedInput::Jump => Some(InputEvent::jump_started()),
        ScriptedInput::StopJumping => Some(InputEvent::jump_completed()),
        ScriptedInput::Move { axis } => Some(InputEvent::move_axis(axis)),
        ScriptedInput::Look { axis } => Some(InputEvent::look(axis)),
        ScriptedInput::Interrupt => None,
    }
}

/// Build a session for `scenario` and return it with the player id.
///
/// # Errors
///
/// Returns a [`SessionError`] if a target or the player cannot be spawned.
pub fn build_session(scenario: &Scenario) -> Result<(GameSession, ActorId), SessionError> {
    let mut registry = AssetRegistry::with_defaults();
    if let Some(character) = &scenario.character {
        registry.register_pawn_class(DEFAULT_PAWN_CLASS, character.clone());
    }
    let mut session = GameSession::with_assets(registry, GameModeConfig::default());

    let player = session.spawn_player(scenario.player.location, scenario.player.yaw)?;
    for target in &scenario.targets {
        match *target {
            TargetSpec::Sphere { center, radius } => session.spawn_target_sphere(center, radius)?,
            TargetSpec::Box { min, max } => session.spawn_target_box(min, max)?,
        };
    }
    if let Some(scatter) = &scenario.scatter {
        session.spawn_scattered_targets(scatter.seed, &scatter.spec)?;
    }
    Ok((session, player))
}

/// Run `scenario` to completion.
///
/// Script steps fire at the start of the first step whose start time is at
/// or after their `at`, in script order for equal times.
///
/// # Errors
///
/// Returns a [`SessionError`] if the scenario is invalid or cannot be built.
#[allow(clippy::cast_precision_loss)]
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport, SessionError> {
    scenario.validate()?;
    let (mut session, player) = build_session(scenario)?;

    let mut script = scenario.script.clone();
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = script.into_iter().peekable();

    let dt = scenario.timestep;
    let step_secs = f64::from(dt);
    let steps = scenario.step_count();
    let mut outcomes = Vec::new();

    for step in 0..steps {
        let start = step as f64 * step_secs;
        while let Some(next) =
            pending.next_if(|s| f64::from(s.at) <= start + step_secs * 0.5)
        {
            match to_event(next.input) {
                Some(event) => {
                    session.dispatch_input(player, &event)?;
                }
                None => session.interrupt_attack(player)?,
            }
        }
        let end = (step + 1) as f64 * step_secs;
        outcomes.extend(
            session
                .step(dt)
                .into_iter()
                .map(|(actor, outcome)| TimedOutcome {
                    time: end,
                    actor,
                    outcome,
                }),
        );
    }

    let final_location = session
        .character(player)
        .map_or(scenario.player.location, |c| c.location());
    let draw = session.debug_draw_mut();
    let report = ScenarioReport {
        steps,
        player,
        outcomes,
        debug_lines: draw.take_lines(),
        log: draw.take_log(),
        final_location,
    };
    tracing::info!(
        steps = report.steps,
        attacks = report.outcomes.len(),
        hits = report.hit_count(),
        "scenario finished"
    );
    Ok(report)
}
