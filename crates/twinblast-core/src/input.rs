//! Mapped input actions and their bindings to character commands.
//!
//! Hosts deliver already-mapped actions ([`InputEvent`]); the character's
//! [`InputBindings`] turn each `(action, trigger)` pair into a
//! [`CharacterCommand`]. Pairs without a binding are dropped.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A mapped input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// 2D movement axis
    Move,
    /// 2D look axis
    Look,
    /// Jump button
    Jump,
    /// Fire button
    Fire,
}

/// Phase of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// The action just became active
    Started,
    /// The action is active this frame
    Triggered,
    /// The action was released
    Completed,
}

/// Value carried by an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    /// Button state
    Digital(bool),
    /// Stick or mouse axis pair
    Axis2D(Vec2),
}

/// One input event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Which action
    pub action: InputAction,
    /// Which phase
    pub trigger: TriggerEvent,
    /// Action value
    pub value: InputValue,
}

impl InputEvent {
    /// Movement axis: `x` strafes right, `y` moves forward.
    #[must_use]
    pub fn move_axis(axis: Vec2) -> Self {
        Self {
            action: InputAction::Move,
            trigger: TriggerEvent::Triggered,
            value: InputValue::Axis2D(axis),
        }
    }

    /// Look axis: `x` adds yaw, `y` adds pitch.
    #[must_use]
    pub fn look(axis: Vec2) -> Self {
        Self {
            action: InputAction::Look,
            trigger: TriggerEvent::Triggered,
            value: InputValue::Axis2D(axis),
        }
    }

    /// Fire pressed.
    #[must_use]
    pub fn fire_started() -> Self {
        Self::button(InputAction::Fire, TriggerEvent::Started, true)
    }

    /// Fire released.
    #[must_use]
    pub fn fire_completed() -> Self {
        Self::button(InputAction::Fire, TriggerEvent::Completed, false)
    }

    /// Jump pressed.
    #[must_use]
    pub fn jump_started() -> Self {
        Self::button(InputAction::Jump, TriggerEvent::Started, true)
    }

    /// Jump released.
    #[must_use]
    pub fn jump_completed() -> Self {
        Self::button(InputAction::Jump, TriggerEvent::Completed, false)
    }

    fn button(action: InputAction, trigger: TriggerEvent, pressed: bool) -> Self {
        Self {
            action,
            trigger,
            value: InputValue::Digital(pressed),
        }
    }

    /// The value as an axis pair; digital values map to zero.
    #[must_use]
    pub fn axis2d(&self) -> Vec2 {
        match self.value {
            InputValue::Axis2D(v) => v,
            InputValue::Digital(_) => Vec2::ZERO,
        }
    }
}

/// What a bound input asks the character to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterCommand {
    /// Start a jump
    Jump,
    /// Release jump
    StopJumping,
    /// Apply movement input from the event's axis
    Move,
    /// Apply look input from the event's axis
    Look,
    /// Request an attack
    Fire,
    /// Release fire
    StopFire,
}

/// Table from `(action, trigger)` to command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBindings {
    bindings: BTreeMap<(InputAction, TriggerEvent), CharacterCommand>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::default_bindings()
    }
}

impl InputBindings {
    /// No bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// The player character's standard bindings.
    #[must_use]
    pub fn default_bindings() -> Self {
        use CharacterCommand as C;
        use InputAction as A;
        use TriggerEvent as T;

        let mut bindings = Self::empty();
        bindings.bind(A::Jump, T::Started, C::Jump);
        bindings.bind(A::Jump, T::Completed, C::StopJumping);
        bindings.bind(A::Move, T::Triggered, C::Move);
        bindings.bind(A::Look, T::Triggered, C::Look);
        bindings.bind(A::Fire, T::Started, C::Fire);
        bindings.bind(A::Fire, T::Completed, C::StopFire);
        bindings
    }

    /// Bind (or rebind) a pair to a command.
    pub fn bind(&mut self, action: InputAction, trigger: TriggerEvent, command: CharacterCommand) {
        self.bindings.insert((action, trigger), command);
    }

    /// Remove a binding, returning the command it had.
    pub fn unbind(
        &mut self,
        action: InputAction,
        trigger: TriggerEvent,
    ) -> Option<CharacterCommand> {
        self.bindings.remove(&(action, trigger))
    }

    /// Command bound to this event, if any.
    #[must_use]
    pub fn resolve(&self, event: &InputEvent) -> Option<CharacterCommand> {
        self.bindings.get(&(event.action, event.trigger)).copied()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_route_host_events() {
        let b = InputBindings::default_bindings();
        assert_eq!(b.len(), 6);
        assert_eq!(b.resolve(&InputEvent::fire_started()), Some(CharacterCommand::Fire));
        assert_eq!(
            b.resolve(&InputEvent::fire_completed()),
            Some(CharacterCommand::StopFire)
        );
        assert_eq!(b.resolve(&InputEvent::jump_started()), Some(CharacterCommand::Jump));
        assert_eq!(
            b.resolve(&InputEvent::jump_completed()),
            Some(CharacterCommand::StopJumping)
        );
        assert_eq!(
            b.resolve(&InputEvent::move_axis(Vec2::Y)),
            Some(CharacterCommand::Move)
        );
        assert_eq!(b.resolve(&InputEvent::look(Vec2::X)), Some(CharacterCommand::Look));
    }

    #[test]
    fn unbound_pairs_are_ignored() {
        let b = InputBindings::default_bindings();
        let held_fire = InputEvent {
            action: InputAction::Fire,
            trigger: TriggerEvent::Triggered,
            value: InputValue::Digital(true),
        };
        assert_eq!(b.resolve(&held_fire), None);
    }

    #[test]
    fn unbind_removes_route() {
        let mut b = InputBindings::default_bindings();
        assert_eq!(
            b.unbind(InputAction::Fire, TriggerEvent::Started),
            Some(CharacterCommand::Fire)
        );
        assert_eq!(b.resolve(&InputEvent::fire_started()), None);
    }

    #[test]
    fn digital_value_has_zero_axis() {
        assert_eq!(InputEvent::fire_started().axis2d(), Vec2::ZERO);
        assert_eq!(InputEvent::look(Vec2::new(1.0, -2.0)).axis2d(), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn events_serialize() {
        let json = serde_json::to_string(&InputEvent::fire_started()).unwrap();
        let back: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InputEvent::fire_started());
    }
}
