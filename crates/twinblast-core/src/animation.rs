//! Attack montage playback.
//!
//! The character never inspects what kind of animation instance it has. It
//! talks to an [`AttackAnimator`]: ask it to play the attack, advance it each
//! frame, and drain the [`MontageEnded`] messages it produces. The host loop
//! hands those messages to the attack resolver.
//!
//! # Example
//!
//! ```
//! use twinblast_core::animation::{AttackAnimator, Montage, MontagePlayer};
//!
//! let mut player = MontagePlayer::new(Some(Montage::new("fire", 0.5)));
//! assert!(player.play_attack_animation());
//! player.update(0.6);
//!
//! let ended = player.take_ended();
//! assert_eq!(ended.len(), 1);
//! assert!(!ended[0].interrupted);
//! ```

use serde::{Deserialize, Serialize};

use crate::assets::AssetRegistry;

/// A timed attack clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Montage {
    /// Asset name
    pub name: String,
    /// Length in seconds at play rate 1.0
    pub duration: f32,
}

impl Montage {
    /// Create a montage.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Message emitted when a montage stops playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageEnded {
    /// Name of the montage that ended
    pub montage: String,
    /// True if playback was cut short
    pub interrupted: bool,
}

/// Animation collaborator for attacks.
pub trait AttackAnimator: Send {
    /// Start the attack animation.
    ///
    /// Returns true if the animation is playing afterwards. Calling this while
    /// the animation is already playing does not restart it.
    fn play_attack_animation(&mut self) -> bool;

    /// Whether the attack animation is currently playing.
    fn is_attack_playing(&self) -> bool;

    /// Advance playback by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// Stop the attack animation early, if it is playing.
    fn interrupt(&mut self);

    /// Drain end-of-animation messages produced since the last call.
    fn take_ended(&mut self) -> Vec<MontageEnded>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePlayback {
    elapsed: f32,
}

/// Default [`AttackAnimator`] playing a single attack montage.
///
/// Built without a montage (the asset could not be found) the player logs
/// the problem once and refuses every play request afterwards.
#[derive(Debug, Clone)]
pub struct MontagePlayer {
    montage: Option<Montage>,
    play_rate: f32,
    active: Option<ActivePlayback>,
    ended: Vec<MontageEnded>,
    play_count: u32,
}

impl MontagePlayer {
    /// Create a player for `montage`.
    #[must_use]
    pub fn new(montage: Option<Montage>) -> Self {
        if montage.is_none() {
            tracing::warn!("attack montage unavailable, attacks will not play");
        }
        Self::with_montage(montage)
    }

    fn with_montage(montage: Option<Montage>) -> Self {
        Self {
            montage,
            play_rate: 1.0,
            active: None,
            ended: Vec::new(),
            play_count: 0,
        }
    }

    /// Create a player for the montage registered at `path`.
    #[must_use]
    pub fn from_registry(registry: &AssetRegistry, path: &str) -> Self {
        let montage = registry.find_montage(path).cloned();
        if montage.is_none() {
            tracing::warn!(path, "montage asset not found, attacks will not play");
        }
        Self::with_montage(montage)
    }

    /// Set the playback speed multiplier. Non-positive rates are ignored.
    #[must_use]
    pub fn with_play_rate(mut self, play_rate: f32) -> Self {
        if play_rate > 0.0 && play_rate.is_finite() {
            self.play_rate = play_rate;
        }
        self
    }

    /// The montage being played, if the asset was available.
    #[must_use]
    pub fn montage(&self) -> Option<&Montage> {
        self.montage.as_ref()
    }

    /// How many times playback has actually started.
    #[must_use]
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Seconds into the current playback, if playing.
    #[must_use]
    pub fn position(&self) -> Option<f32> {
        self.active.map(|a| a.elapsed)
    }

    fn finish(&mut self, interrupted: bool) {
        if self.active.take().is_none() {
            return;
        }
        let name = self
            .montage
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default();
        tracing::debug!(montage = %name, interrupted, "montage ended");
        self.ended.push(MontageEnded {
            montage: name,
            interrupted,
        });
    }
}

impl AttackAnimator for MontagePlayer {
    fn play_attack_animation(&mut self) -> bool {
        let Some(montage) = &self.montage else {
            return false;
        };
        if self.active.is_some() {
            return true;
        }
        tracing::debug!(montage = %montage.name, "montage started");
        self.active = Some(ActivePlayback { elapsed: 0.0 });
        self.play_count += 1;
        true
    }

    fn is_attack_playing(&self) -> bool {
        self.active.is_some()
    }

    fn update(&mut self, dt: f32) {
        let duration = self.montage.as_ref().map_or(0.0, |m| m.duration);
        let finished = match &mut self.active {
            Some(active) => {
                active.elapsed += dt * self.play_rate;
                active.elapsed >= duration
            }
            None => false,
        };
        if finished {
            self.finish(false);
        }
    }

    fn interrupt(&mut self) {
        self.finish(true);
    }

    fn take_ended(&mut self) -> Vec<MontageEnded> {
        std::mem::take(&mut self.ended)
    }
}
