//! Camera boom and follow camera.
//!
//! The boom hangs behind its pivot along the boom rotation. When
//! `do_collision_test` is set, a trace on the camera channel from the pivot
//! to the desired camera location pulls the camera in to the first blocker.
//! The owner's own colliders never block its camera.

use glam::Vec3;
use hitscan::{ActorId, CollisionChannels, CollisionWorld, QueryParams};
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::math::Rotator;

/// Where the follow camera ended up this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Camera location
    pub location: Vec3,
    /// Camera rotation
    pub rotation: Rotator,
    /// Actual boom length after collision
    pub arm_length: f32,
}

/// Spring arm holding the follow camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBoom {
    config: CameraConfig,
}

impl CameraBoom {
    /// Boom configured by `config`.
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    /// Boom length with nothing in the way.
    #[must_use]
    pub fn target_arm_length(&self) -> f32 {
        self.config.target_arm_length
    }

    /// Place the camera for this frame.
    ///
    /// `control` is the controller rotation if the character is possessed;
    /// the boom falls back to `actor_rotation` when it is absent or when the
    /// boom is not driven by the controller.
    #[must_use]
    pub fn update(
        &self,
        owner: ActorId,
        pivot: Vec3,
        control: Option<Rotator>,
        actor_rotation: Rotator,
        world: &CollisionWorld,
    ) -> CameraView {
        let boom_rotation = match control {
            Some(control) if self.config.use_pawn_control_rotation => control,
            _ => actor_rotation,
        };
        let camera_rotation = match control {
            Some(control) if self.config.camera_uses_pawn_control_rotation => control,
            _ => boom_rotation,
        };

        let desired = pivot - boom_rotation.forward() * self.config.target_arm_length;
        let mut view = CameraView {
            location: desired,
            rotation: camera_rotation,
            arm_length: self.config.target_arm_length,
        };

        if self.config.do_collision_test {
            let params = QueryParams::new().with_ignored_actor(owner);
            let blocked =
                world.line_trace_single(pivot, desired, CollisionChannels::CAMERA, &params);
            if let Some(hit) = blocked {
                tracing::trace!(
                    blocker = %hit.actor,
                    distance = hit.distance,
                    "camera boom blocked"
                );
                view.location = hit.point;
                view.arm_length = hit.distance;
            }
        }
        view
    }
}
