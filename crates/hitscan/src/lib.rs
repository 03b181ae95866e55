//! # Hitscan
//!
//! Collision world and segment queries for hit detection.
//!
//! Hitscan stores simple collision volumes owned by actors and answers the
//! one question gameplay code keeps asking: "what is the first solid thing
//! along this segment?" It provides:
//!
//! - **Collider shapes**: spheres, axis-aligned boxes and capsules
//! - **Collision channels**: per-collider blocking responses, filtered per query
//! - **Line traces**: nearest blocking hit or every blocking hit, with an
//!   ignored-actor set so an attacker never hits itself
//! - **Scatter**: deterministic placement of target volumes from a seed
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec3;
//! use hitscan::{ActorId, Collider, ColliderShape, CollisionChannels, CollisionWorld, QueryParams};
//!
//! let mut world = CollisionWorld::new();
//! let target = ActorId::new(7);
//! world
//!     .insert(Collider::new(
//!         target,
//!         ColliderShape::sphere(Vec3::new(500.0, 0.0, 0.0), 50.0),
//!         CollisionChannels::ATTACK,
//!     ))
//!     .unwrap();
//!
//! let hit = world
//!     .line_trace_single(
//!         Vec3::ZERO,
//!         Vec3::new(10_000.0, 0.0, 0.0),
//!         CollisionChannels::ATTACK,
//!         &QueryParams::new(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(hit.actor, target);
//! assert!((hit.point.x - 450.0).abs() < 0.01);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod channel;
pub mod error;
pub mod scatter;
pub mod shape;
pub mod world;

// Re-exports for convenience
pub use actor::{ActorId, ColliderHandle};
pub use channel::CollisionChannels;
pub use error::WorldError;
pub use scatter::{scatter_spheres, ScatterSpec};
pub use shape::ColliderShape;
pub use world::{Collider, CollisionWorld, QueryParams, TraceHit};

use glam::Vec3;

/// Directions shorter than this are treated as zero when tracing.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from dimensions (centered at origin).
    #[must_use]
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            min: Vec3::new(-width / 2.0, -height / 2.0, -depth / 2.0),
            max: Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create bounds from a center point and half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this bounds overlaps another.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Return these bounds moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Distance along a ray at which it enters the bounds (slab test).
    ///
    /// `dir` must be unit length. Returns `Some(0.0)` when `origin` is already
    /// inside, `None` when the ray misses within `max_distance`.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d.abs() < DIRECTION_EPSILON {
                // Parallel to this slab: must already be between its planes
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}
