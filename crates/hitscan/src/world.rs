//! Collision world: collider storage and line traces.
//!
//! # Determinism
//!
//! Colliders live in a `BTreeMap` keyed by [`ColliderHandle`], so iteration
//! order is insertion order on every platform. When two colliders are hit at
//! exactly the same distance the one with the lower handle wins.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use hitscan::{ActorId, Collider, ColliderShape, CollisionChannels, CollisionWorld, QueryParams};
//!
//! let mut world = CollisionWorld::new();
//! let me = ActorId::new(1);
//! world
//!     .insert(Collider::new(
//!         me,
//!         ColliderShape::upright_capsule(Vec3::ZERO, 42.0, 96.0),
//!         CollisionChannels::PAWN | CollisionChannels::ATTACK,
//!     ))
//!     .unwrap();
//!
//! // Tracing out of my own capsule hits me unless I am ignored
//! let end = Vec3::new(1000.0, 0.0, 0.0);
//! assert!(world
//!     .line_trace_single(Vec3::ZERO, end, CollisionChannels::ATTACK, &QueryParams::new())
//!     .is_some());
//! let params = QueryParams::new().with_ignored_actor(me);
//! assert!(world
//!     .line_trace_single(Vec3::ZERO, end, CollisionChannels::ATTACK, &params)
//!     .is_none());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, ColliderHandle};
use crate::channel::CollisionChannels;
use crate::error::WorldError;
use crate::shape::ColliderShape;

/// A collision volume owned by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Actor this collider belongs to
    pub owner: ActorId,
    /// Geometry in world space
    pub shape: ColliderShape,
    /// Channels this collider blocks
    pub blocks: CollisionChannels,
}

impl Collider {
    /// Create a collider.
    #[must_use]
    pub fn new(owner: ActorId, shape: ColliderShape, blocks: CollisionChannels) -> Self {
        Self {
            owner,
            shape,
            blocks,
        }
    }
}

/// Extra parameters for a trace query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    ignored_actors: BTreeSet<ActorId>,
}

impl QueryParams {
    /// Parameters that ignore nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude every collider owned by `actor` from the query.
    pub fn add_ignored_actor(&mut self, actor: ActorId) {
        self.ignored_actors.insert(actor);
    }

    /// Builder form of [`add_ignored_actor`](Self::add_ignored_actor).
    #[must_use]
    pub fn with_ignored_actor(mut self, actor: ActorId) -> Self {
        self.add_ignored_actor(actor);
        self
    }

    /// Returns true if `actor` is excluded.
    #[must_use]
    pub fn is_ignored(&self, actor: ActorId) -> bool {
        self.ignored_actors.contains(&actor)
    }

    /// Iterate over ignored actors in id order.
    pub fn ignored_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.ignored_actors.iter().copied()
    }
}

/// A blocking intersection found by a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceHit {
    /// Owner of the collider that was hit
    pub actor: ActorId,
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// World-space impact point
    pub point: Vec3,
    /// Distance from the trace start to the impact point
    pub distance: f32,
    /// Impact position as a fraction of the segment length
    pub fraction: f32,
}

/// Storage for colliders plus the queries run against them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    colliders: BTreeMap<ColliderHandle, Collider>,
    next_handle: u64,
}

impl CollisionWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of colliders in the world.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Returns true if the world holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Add a collider and return its handle.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the shape fails validation.
    pub fn insert(&mut self, collider: Collider) -> Result<ColliderHandle, WorldError> {
        collider.shape.validate()?;
        let handle = ColliderHandle::new(self.next_handle);
        self.next_handle += 1;
        self.colliders.insert(handle, collider);
        tracing::debug!(
            handle = %handle,
            owner = %collider.owner,
            "collider inserted"
        );
        Ok(handle)
    }

    /// Remove a collider.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCollider`] if the handle is not present.
    pub fn remove(&mut self, handle: ColliderHandle) -> Result<Collider, WorldError> {
        self.colliders
            .remove(&handle)
            .ok_or(WorldError::UnknownCollider(handle))
    }

    /// Remove every collider owned by `actor`, returning how many were removed.
    pub fn remove_actor(&mut self, actor: ActorId) -> usize {
        let before = self.colliders.len();
        self.colliders.retain(|_, c| c.owner != actor);
        let removed = before - self.colliders.len();
        tracing::debug!(actor = %actor, removed, "actor colliders removed");
        removed
    }

    /// Look up a collider.
    #[must_use]
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(&handle)
    }

    /// Replace the shape of an existing collider.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCollider`] for a missing handle, or a
    /// validation error for a malformed shape.
    pub fn set_shape(
        &mut self,
        handle: ColliderHandle,
        shape: ColliderShape,
    ) -> Result<(), WorldError> {
        shape.validate()?;
        let collider = self
            .colliders
            .get_mut(&handle)
            .ok_or(WorldError::UnknownCollider(handle))?;
        collider.shape = shape;
        Ok(())
    }

    /// Move every collider owned by `actor` by `offset`.
    ///
    /// Returns how many colliders moved.
    pub fn translate_actor(&mut self, actor: ActorId, offset: Vec3) -> usize {
        let mut moved = 0;
        for collider in self.colliders.values_mut().filter(|c| c.owner == actor) {
            collider.shape = collider.shape.translated(offset);
            moved += 1;
        }
        moved
    }

    /// Iterate over the colliders owned by `actor`.
    pub fn colliders_of(
        &self,
        actor: ActorId,
    ) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders
            .iter()
            .filter(move |(_, c)| c.owner == actor)
            .map(|(h, c)| (*h, c))
    }

    /// Iterate over all colliders in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders.iter().map(|(h, c)| (*h, c))
    }

    /// Trace a segment and return the nearest blocking hit on `channel`.
    ///
    /// Colliders that do not block `channel`, and colliders owned by an
    /// ignored actor, are skipped.
    #[must_use]
    pub fn line_trace_single(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &QueryParams,
    ) -> Option<TraceHit> {
        let mut best: Option<TraceHit> = None;
        for hit in self.candidate_hits(start, end, channel, params) {
            // Strictly closer only: equal distances keep the lower handle
            if best.map_or(true, |b| hit.fraction < b.fraction) {
                best = Some(hit);
            }
        }
        tracing::trace!(
            start = %start,
            end = %end,
            hit = best.is_some(),
            "line trace single"
        );
        best
    }

    /// Trace a segment and return every blocking hit on `channel`, nearest first.
    #[must_use]
    pub fn line_trace_multi(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &QueryParams,
    ) -> Vec<TraceHit> {
        let mut hits: Vec<TraceHit> = self.candidate_hits(start, end, channel, params).collect();
        hits.sort_by(|a, b| {
            a.fraction
                .total_cmp(&b.fraction)
                .then(a.collider.cmp(&b.collider))
        });
        hits
    }

    fn candidate_hits<'a>(
        &'a self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannels,
        params: &'a QueryParams,
    ) -> impl Iterator<Item = TraceHit> + 'a {
        let length = start.distance(end);
        self.colliders
            .iter()
            .filter(move |(_, c)| c.blocks.blocks(channel) && !params.is_ignored(c.owner))
            .filter_map(move |(handle, c)| {
                let fraction = c.shape.intersect_segment(start, end)?;
                Some(TraceHit {
                    actor: c.owner,
                    collider: *handle,
                    point: start.lerp(end, fraction),
                    distance: length * fraction,
                    fraction,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTACK: CollisionChannels = CollisionChannels::ATTACK;

    fn target(world: &mut CollisionWorld, id: u64, center: Vec3, radius: f32) -> ColliderHandle {
        world
            .insert(Collider::new(
                ActorId::new(id),
                ColliderShape::sphere(center, radius),
                CollisionChannels::SOLID,
            ))
            .unwrap()
    }

    mod storage_tests {
        use super::*;

        #[test]
        fn insert_assigns_increasing_handles() {
            let mut world = CollisionWorld::new();
            let a = target(&mut world, 1, Vec3::ZERO, 1.0);
            let b = target(&mut world, 2, Vec3::ZERO, 1.0);
            assert!(a < b);
            assert_eq!(world.len(), 2);
        }

        #[test]
        fn insert_rejects_invalid_shape() {
            let mut world = CollisionWorld::new();
            let result = world.insert(Collider::new(
                ActorId::new(1),
                ColliderShape::sphere(Vec3::ZERO, -1.0),
                ATTACK,
            ));
            assert_eq!(result, Err(WorldError::InvalidSize(-1.0)));
            assert!(world.is_empty());
        }

        #[test]
        fn remove_unknown_handle_errors() {
            let mut world = CollisionWorld::new();
            let missing = ColliderHandle::new(99);
            assert_eq!(
                world.remove(missing),
                Err(WorldError::UnknownCollider(missing))
            );
        }

        #[test]
        fn remove_actor_drops_all_its_colliders() {
            let mut world = CollisionWorld::new();
            target(&mut world, 1, Vec3::ZERO, 1.0);
            target(&mut world, 1, Vec3::X, 1.0);
            target(&mut world, 2, Vec3::Y, 1.0);
            assert_eq!(world.remove_actor(ActorId::new(1)), 2);
            assert_eq!(world.len(), 1);
        }

        #[test]
        fn translate_actor_moves_only_that_actor() {
            let mut world = CollisionWorld::new();
            let mine = target(&mut world, 1, Vec3::ZERO, 1.0);
            let theirs = target(&mut world, 2, Vec3::ZERO, 1.0);
            assert_eq!(world.translate_actor(ActorId::new(1), Vec3::X * 10.0), 1);
            assert_eq!(world.get(mine).unwrap().shape.center(), Vec3::X * 10.0);
            assert_eq!(world.get(theirs).unwrap().shape.center(), Vec3::ZERO);
        }

        #[test]
        fn set_shape_on_unknown_handle_errors() {
            let mut world = CollisionWorld::new();
            let missing = ColliderHandle::new(5);
            assert_eq!(
                world.set_shape(missing, ColliderShape::sphere(Vec3::ZERO, 1.0)),
                Err(WorldError::UnknownCollider(missing))
            );
        }
    }

    mod trace_tests {
        use super::*;

        #[test]
        fn sphere_ahead_is_hit_on_its_surface() {
            let mut world = CollisionWorld::new();
            target(&mut world, 1, Vec3::new(500.0, 0.0, 0.0), 50.0);

            let hit = world
                .line_trace_single(
                    Vec3::ZERO,
                    Vec3::new(10_000.0, 0.0, 0.0),
                    ATTACK,
                    &QueryParams::new(),
                )
                .unwrap();

            assert_eq!(hit.actor, ActorId::new(1));
            assert!((hit.point - Vec3::new(450.0, 0.0, 0.0)).length() < 0.01);
            assert!((hit.distance - 450.0).abs() < 0.01);
        }

        #[test]
        fn empty_world_has_no_hit() {
            let world = CollisionWorld::new();
            assert!(world
                .line_trace_single(Vec3::ZERO, Vec3::X * 100.0, ATTACK, &QueryParams::new())
                .is_none());
        }

        #[test]
        fn nearest_of_several_wins() {
            let mut world = CollisionWorld::new();
            target(&mut world, 1, Vec3::new(900.0, 0.0, 0.0), 50.0);
            target(&mut world, 2, Vec3::new(300.0, 0.0, 0.0), 50.0);
            target(&mut world, 3, Vec3::new(600.0, 0.0, 0.0), 50.0);

            let hit = world
                .line_trace_single(Vec3::ZERO, Vec3::X * 10_000.0, ATTACK, &QueryParams::new())
                .unwrap();
            assert_eq!(hit.actor, ActorId::new(2));
        }

        #[test]
        fn equal_distance_keeps_lower_handle() {
            let mut world = CollisionWorld::new();
            let first = target(&mut world, 1, Vec3::new(300.0, 0.0, 0.0), 50.0);
            target(&mut world, 2, Vec3::new(300.0, 0.0, 0.0), 50.0);

            let hit = world
                .line_trace_single(Vec3::ZERO, Vec3::X * 10_000.0, ATTACK, &QueryParams::new())
                .unwrap();
            assert_eq!(hit.collider, first);
        }

        #[test]
        fn non_blocking_channel_is_transparent() {
            let mut world = CollisionWorld::new();
            world
                .insert(Collider::new(
                    ActorId::new(1),
                    ColliderShape::sphere(Vec3::new(300.0, 0.0, 0.0), 50.0),
                    CollisionChannels::CAMERA,
                ))
                .unwrap();

            assert!(world
                .line_trace_single(Vec3::ZERO, Vec3::X * 10_000.0, ATTACK, &QueryParams::new())
                .is_none());
        }

        #[test]
        fn ignored_actor_is_skipped_even_when_enclosing_start() {
            let mut world = CollisionWorld::new();
            let me = ActorId::new(1);
            world
                .insert(Collider::new(
                    me,
                    ColliderShape::upright_capsule(Vec3::ZERO, 42.0, 96.0),
                    CollisionChannels::SOLID,
                ))
                .unwrap();
            target(&mut world, 2, Vec3::new(500.0, 0.0, 0.0), 50.0);

            let params = QueryParams::new().with_ignored_actor(me);
            let hit = world
                .line_trace_single(Vec3::ZERO, Vec3::X * 10_000.0, ATTACK, &params)
                .unwrap();
            assert_eq!(hit.actor, ActorId::new(2));
        }

        #[test]
        fn multi_trace_orders_by_distance() {
            let mut world = CollisionWorld::new();
            target(&mut world, 1, Vec3::new(900.0, 0.0, 0.0), 50.0);
            target(&mut world, 2, Vec3::new(300.0, 0.0, 0.0), 50.0);
            target(&mut world, 3, Vec3::new(600.0, 0.0, 0.0), 50.0);

            let hits =
                world.line_trace_multi(Vec3::ZERO, Vec3::X * 10_000.0, ATTACK, &QueryParams::new());
            let order: Vec<u64> = hits.iter().map(|h| h.actor.as_u64()).collect();
            assert_eq!(order, vec![2, 3, 1]);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ignored_actor_never_returned(
                x in -2000.0f32..2000.0,
                y in -2000.0f32..2000.0,
                radius in 1.0f32..500.0,
            ) {
                let mut world = CollisionWorld::new();
                let me = ActorId::new(1);
                world
                    .insert(Collider::new(
                        me,
                        ColliderShape::sphere(Vec3::new(x, y, 0.0), radius),
                        CollisionChannels::SOLID,
                    ))
                    .unwrap();

                let params = QueryParams::new().with_ignored_actor(me);
                let hit = world.line_trace_single(
                    Vec3::ZERO,
                    Vec3::new(10_000.0, 0.0, 0.0),
                    ATTACK,
                    &params,
                );
                prop_assert!(hit.is_none());
            }

            #[test]
            fn hit_point_lies_on_segment(
                cx in 100.0f32..5000.0,
                cy in -40.0f32..40.0,
                radius in 45.0f32..200.0,
            ) {
                let mut world = CollisionWorld::new();
                target(&mut world, 2, Vec3::new(cx, cy, 0.0), radius);
                let end = Vec3::new(10_000.0, 0.0, 0.0);

                let hit = world
                    .line_trace_single(Vec3::ZERO, end, ATTACK, &QueryParams::new())
                    .unwrap();
                prop_assert!(hit.point.y.abs() < 1e-3);
                prop_assert!(hit.point.x >= 0.0 && hit.point.x <= cx);
                prop_assert!((0.0..=1.0).contains(&hit.fraction));
            }
        }
    }
}
