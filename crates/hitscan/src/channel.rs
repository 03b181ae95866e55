//! Collision channels.
//!
//! Every collider declares which channels it blocks. A trace runs on one
//! channel and only colliders blocking that channel can stop it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of collision channels a collider blocks.
    ///
    /// # Example
    ///
    /// ```
    /// use hitscan::CollisionChannels;
    ///
    /// let pawn = CollisionChannels::PAWN | CollisionChannels::ATTACK;
    /// assert!(pawn.blocks(CollisionChannels::ATTACK));
    /// assert!(!pawn.blocks(CollisionChannels::CAMERA));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct CollisionChannels: u32 {
        /// Level geometry that never moves
        const WORLD_STATIC = 1 << 0;
        /// Movable props
        const WORLD_DYNAMIC = 1 << 1;
        /// Character capsules
        const PAWN = 1 << 2;
        /// Line-of-sight checks
        const VISIBILITY = 1 << 3;
        /// Camera boom probes
        const CAMERA = 1 << 4;
        /// Attack hit-scan
        const ATTACK = 1 << 5;
    }
}

impl CollisionChannels {
    /// Response set for solid level geometry: blocks every query channel.
    pub const SOLID: Self = Self::all();

    /// Returns true if this response set stops a trace on `channel`.
    #[must_use]
    pub fn blocks(self, channel: CollisionChannels) -> bool {
        self.intersects(channel)
    }
}

impl Default for CollisionChannels {
    fn default() -> Self {
        Self::SOLID
    }
}
