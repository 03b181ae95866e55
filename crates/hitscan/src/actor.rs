//! Identifier types for actors and the colliders they own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor in the collision world.
///
/// An actor is anything that owns collision volumes: a player character,
/// a target dummy, a wall. Traces report the owning actor of whatever they
/// hit, and [`QueryParams`](crate::QueryParams) ignores actors by id.
///
/// # Example
///
/// ```
/// use hitscan::ActorId;
///
/// let a = ActorId::new(1);
/// let b = ActorId::new(2);
/// assert!(a < b);
/// assert_eq!(a.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<ActorId> for u64 {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Handle to a single collider stored in a [`CollisionWorld`](crate::CollisionWorld).
///
/// Handles are allocated monotonically and never reused within a world, so
/// ordering by handle is insertion order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(u64);

impl ColliderHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ColliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColliderHandle({})", self.0)
    }
}

impl fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
