//! Errors raised when building or editing a collision world.

use glam::Vec3;

use crate::actor::ColliderHandle;

/// Error type for collision world operations.
///
/// Queries never fail: a trace that finds nothing returns `None`. Only
/// structural edits (inserting malformed shapes, touching unknown handles,
/// bad scatter parameters) produce errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A radius or half extent was zero, negative, or not finite.
    #[error("collider size must be finite and positive, got {0}")]
    InvalidSize(f32),

    /// A box had its minimum corner beyond its maximum corner.
    #[error("box bounds are inverted: min {min} exceeds max {max}")]
    InvertedBounds {
        /// Minimum corner as given
        min: Vec3,
        /// Maximum corner as given
        max: Vec3,
    },

    /// A shape position contained NaN or infinity.
    #[error("collider shape has a non-finite coordinate")]
    NonFinite,

    /// The handle does not name a collider in this world.
    #[error("unknown collider {0}")]
    UnknownCollider(ColliderHandle),

    /// Scatter parameters cannot produce a placement.
    #[error("invalid scatter spec: {0}")]
    InvalidScatter(&'static str),
}
