//! Deterministic placement of target volumes.
//!
//! Scenarios and benchmarks need worlds full of targets that look random but
//! replay identically. Scatter draws positions from a seeded ChaCha8 stream,
//! so the same seed and spec always produce the same spheres.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::shape::ColliderShape;

/// Parameters for [`scatter_spheres`].
///
/// Spheres are placed on the horizontal plane through `center`, at a random
/// bearing and at a random distance in `[min_distance, max_distance]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    /// Number of spheres to place
    pub count: usize,
    /// Radius of every sphere
    pub radius: f32,
    /// Ring center
    #[serde(default)]
    pub center: Vec3,
    /// Closest allowed distance from `center`
    pub min_distance: f32,
    /// Farthest allowed distance from `center`
    pub max_distance: f32,
}

impl ScatterSpec {
    /// Check that the spec can produce a placement.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidScatter`] or [`WorldError::InvalidSize`].
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(WorldError::InvalidSize(self.radius));
        }
        if !self.center.is_finite() {
            return Err(WorldError::NonFinite);
        }
        if !(self.min_distance.is_finite() && self.max_distance.is_finite()) {
            return Err(WorldError::InvalidScatter("distances must be finite"));
        }
        if self.min_distance < 0.0 {
            return Err(WorldError::InvalidScatter("min_distance is negative"));
        }
        if self.min_distance > self.max_distance {
            return Err(WorldError::InvalidScatter("min_distance exceeds max_distance"));
        }
        Ok(())
    }
}

/// Place `spec.count` spheres deterministically from `seed`.
///
/// # Errors
///
/// Returns a [`WorldError`] if `spec` fails validation.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use hitscan::{scatter_spheres, ScatterSpec};
///
/// let spec = ScatterSpec {
///     count: 4,
///     radius: 50.0,
///     center: Vec3::ZERO,
///     min_distance: 200.0,
///     max_distance: 800.0,
/// };
/// let a = scatter_spheres(7, &spec).unwrap();
/// let b = scatter_spheres(7, &spec).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn scatter_spheres(seed: u64, spec: &ScatterSpec) -> Result<Vec<ColliderShape>, WorldError> {
    spec.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let shapes = (0..spec.count)
        .map(|_| {
            let bearing = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance = if spec.max_distance > spec.min_distance {
                rng.gen_range(spec.min_distance..=spec.max_distance)
            } else {
                spec.min_distance
            };
            let offset = Vec3::new(bearing.cos(), bearing.sin(), 0.0) * distance;
            ColliderShape::sphere(spec.center + offset, spec.radius)
        })
        .collect();
    tracing::debug!(seed, count = spec.count, "scattered target spheres");
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ScatterSpec {
        ScatterSpec {
            count: 16,
            radius: 25.0,
            center: Vec3::new(10.0, 20.0, 96.0),
            min_distance: 300.0,
            max_distance: 900.0,
        }
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(scatter_spheres(42, &spec()), scatter_spheres(42, &spec()));
    }

    #[test]
    fn different_seed_different_layout() {
        assert_ne!(
            scatter_spheres(1, &spec()).unwrap(),
            scatter_spheres(2, &spec()).unwrap()
        );
    }

    #[test]
    fn placements_respect_ring() {
        let spec = spec();
        for shape in scatter_spheres(9, &spec).unwrap() {
            let offset = shape.center() - spec.center;
            assert!(offset.z.abs() < 1e-3);
            let d = offset.length();
            assert!(d >= spec.min_distance - 1e-2 && d <= spec.max_distance + 1e-2);
        }
    }

    #[test]
    fn inverted_ring_is_rejected() {
        let mut bad = spec();
        bad.min_distance = 1000.0;
        assert_eq!(
            scatter_spheres(0, &bad),
            Err(WorldError::InvalidScatter("min_distance exceeds max_distance"))
        );
    }

    #[test]
    fn fixed_distance_ring_is_allowed() {
        let mut ring = spec();
        ring.min_distance = 500.0;
        ring.max_distance = 500.0;
        assert_eq!(scatter_spheres(3, &ring).unwrap().len(), 16);
    }
}
