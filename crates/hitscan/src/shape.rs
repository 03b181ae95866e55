//! Collider shapes and segment intersection.
//!
//! All intersection routines work on a segment `start -> end` and report the
//! entry point as a fraction of the segment length in `[0, 1]`. A segment that
//! starts inside a shape hits at fraction `0.0`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::{Bounds, DIRECTION_EPSILON};

/// Shape of a collision volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere defined by center and radius
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box
    Box { bounds: Bounds },
    /// Capsule (two endpoints + radius)
    Capsule { p0: Vec3, p1: Vec3, radius: f32 },
}

impl ColliderShape {
    /// Create a sphere shape.
    #[must_use]
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    /// Create a box shape from min/max corners.
    #[must_use]
    pub fn box_min_max(min: Vec3, max: Vec3) -> Self {
        Self::Box {
            bounds: Bounds::from_min_max(min, max),
        }
    }

    /// Create a box shape from a center and half extents.
    #[must_use]
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        Self::Box {
            bounds: Bounds::from_center_half_extents(center, half_extents),
        }
    }

    /// Create a capsule shape.
    #[must_use]
    pub fn capsule(p0: Vec3, p1: Vec3, radius: f32) -> Self {
        Self::Capsule { p0, p1, radius }
    }

    /// Create an upright capsule the way characters describe theirs.
    ///
    /// `half_height` runs from the center to the tip of either hemisphere,
    /// so the core segment is `half_height - radius` long on each side.
    #[must_use]
    pub fn upright_capsule(center: Vec3, radius: f32, half_height: f32) -> Self {
        let core = (half_height - radius).max(0.0);
        Self::Capsule {
            p0: center - Vec3::Z * core,
            p1: center + Vec3::Z * core,
            radius,
        }
    }

    /// Check that sizes are positive and coordinates finite.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), WorldError> {
        let check_radius = |radius: f32| {
            if radius.is_finite() && radius > 0.0 {
                Ok(())
            } else {
                Err(WorldError::InvalidSize(radius))
            }
        };
        match *self {
            ColliderShape::Sphere { center, radius } => {
                if !center.is_finite() {
                    return Err(WorldError::NonFinite);
                }
                check_radius(radius)
            }
            ColliderShape::Box { bounds } => {
                if !bounds.min.is_finite() || !bounds.max.is_finite() {
                    return Err(WorldError::NonFinite);
                }
                if bounds.min.cmpgt(bounds.max).any() {
                    return Err(WorldError::InvertedBounds {
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
                Ok(())
            }
            ColliderShape::Capsule { p0, p1, radius } => {
                if !p0.is_finite() || !p1.is_finite() {
                    return Err(WorldError::NonFinite);
                }
                check_radius(radius)
            }
        }
    }

    /// Get the bounding box of this shape.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            ColliderShape::Sphere { center, radius } => Bounds::from_min_max(
                *center - Vec3::splat(*radius),
                *center + Vec3::splat(*radius),
            ),
            ColliderShape::Box { bounds } => *bounds,
            ColliderShape::Capsule { p0, p1, radius } => {
                let min = p0.min(*p1) - Vec3::splat(*radius);
                let max = p0.max(*p1) + Vec3::splat(*radius);
                Bounds::from_min_max(min, max)
            }
        }
    }

    /// Center of the shape.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        match self {
            ColliderShape::Sphere { center, .. } => *center,
            ColliderShape::Box { bounds } => bounds.center(),
            ColliderShape::Capsule { p0, p1, .. } => (*p0 + *p1) * 0.5,
        }
    }

    /// Return this shape moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        match *self {
            ColliderShape::Sphere { center, radius } => ColliderShape::Sphere {
                center: center + offset,
                radius,
            },
            ColliderShape::Box { bounds } => ColliderShape::Box {
                bounds: bounds.translated(offset),
            },
            ColliderShape::Capsule { p0, p1, radius } => ColliderShape::Capsule {
                p0: p0 + offset,
                p1: p1 + offset,
                radius,
            },
        }
    }

    /// Check if a point is inside this shape.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            ColliderShape::Sphere { center, radius } => center.distance(point) <= *radius,
            ColliderShape::Box { bounds } => bounds.contains(point),
            ColliderShape::Capsule { p0, p1, radius } => {
                closest_on_segment(*p0, *p1, point).distance(point) <= *radius
            }
        }
    }

    /// Intersect the segment `start -> end` with this shape.
    ///
    /// Returns the entry fraction in `[0, 1]`, or `None` if the segment
    /// misses. Zero-length segments hit only when `start` is inside.
    #[must_use]
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<f32> {
        let delta = end - start;
        let length = delta.length();
        if length < DIRECTION_EPSILON {
            return self.contains(start).then_some(0.0);
        }
        let dir = delta / length;

        let distance = match *self {
            ColliderShape::Sphere { center, radius } => {
                ray_sphere(start, dir, length, center, radius)
            }
            ColliderShape::Box { bounds } => bounds.ray_entry(start, dir, length),
            ColliderShape::Capsule { p0, p1, radius } => {
                ray_capsule(start, dir, length, p0, p1, radius)
            }
        }?;

        Some((distance / length).clamp(0.0, 1.0))
    }
}

/// Closest point to `point` on segment `a -> b`.
fn closest_on_segment(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
    let ab = b - a;
    let denom = ab.length_squared();
    if denom < DIRECTION_EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / denom).clamp(0.0, 1.0);
    a + ab * t
}

/// Entry distance of a unit ray into a sphere, within `max_distance`.
fn ray_sphere(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        // Starts inside
        return Some(0.0);
    }
    let b = m.dot(dir);
    if b > 0.0 {
        // Outside and pointing away
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t <= max_distance).then_some(t.max(0.0))
}

/// Entry distance of a unit ray into a capsule, within `max_distance`.
///
/// Tests the finite cylinder around the core segment and both end caps,
/// keeping the nearest entry.
fn ray_capsule(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    p0: Vec3,
    p1: Vec3,
    radius: f32,
) -> Option<f32> {
    if closest_on_segment(p0, p1, origin).distance_squared(origin) <= radius * radius {
        return Some(0.0);
    }

    let axis = p1 - p0;
    let axis_len = axis.length();
    let mut best: Option<f32> = None;
    let mut consider = |t: Option<f32>| {
        if let Some(t) = t {
            if best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    };

    consider(ray_sphere(origin, dir, max_distance, p0, radius));
    if axis_len >= DIRECTION_EPSILON {
        consider(ray_sphere(origin, dir, max_distance, p1, radius));

        // Finite cylinder: work in the plane perpendicular to the axis
        let unit_axis = axis / axis_len;
        let w = origin - p0;
        let dir_perp = dir - unit_axis * dir.dot(unit_axis);
        let w_perp = w - unit_axis * w.dot(unit_axis);
        let a = dir_perp.length_squared();
        if a >= DIRECTION_EPSILON {
            let b = 2.0 * dir_perp.dot(w_perp);
            let c = w_perp.length_squared() - radius * radius;
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let t = (-b - disc.sqrt()) / (2.0 * a);
                if (0.0..=max_distance).contains(&t) {
                    let along = (origin + dir * t - p0).dot(unit_axis);
                    if (0.0..=axis_len).contains(&along) {
                        consider(Some(t));
                    }
                }
            }
        }
    }

    best
}
