//! Movement state and input structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::Aabb;

/// Flags describing the player's current movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFlags(pub u16);

impl MovementFlags {
    /// Player is supported by a platform top.
    pub const ON_GROUND: u16 = 1 << 0;

    /// Player left the ground through a jump and has not landed yet.
    pub const JUMPING: u16 = 1 << 1;

    /// Check if a flag is set.
    #[inline]
    pub fn has(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u16, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    #[inline]
    pub fn on_ground(self) -> bool {
        self.has(Self::ON_GROUND)
    }

    #[inline]
    pub fn jumping(self) -> bool {
        self.has(Self::JUMPING)
    }
}

/// Complete kinematic state for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Position in world space (center of the feet).
    pub position: Vec3,

    /// Carried momentum (meters/second): gravity, jumps and hook pulls.
    ///
    /// Held directions never accumulate here; see [`walk_velocity`](Self::walk_velocity).
    pub velocity: Vec3,

    /// Locomotion velocity applied during the last step.
    pub walk_velocity: Vec3,

    /// Yaw in radians, kept in `[0, 2π)`. Zero faces +Z.
    pub theta: f32,

    /// Pitch in radians. Positive looks down.
    pub phi: f32,

    /// Movement state flags.
    pub flags: MovementFlags,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            walk_velocity: Vec3::ZERO,
            theta: 0.0,
            phi: 0.0,
            flags: MovementFlags::default(),
        }
    }
}

impl MovementState {
    /// Create a new movement state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the eye position (for camera placement and hook casts).
    pub fn eye_position(&self, eye_height: f32) -> Vec3 {
        self.position + Vec3::new(0.0, eye_height, 0.0)
    }

    /// Body box for a player of the given half width and height.
    pub fn body(&self, half_width: f32, height: f32) -> Aabb {
        Aabb::new(
            self.position - Vec3::new(half_width, 0.0, half_width),
            self.position + Vec3::new(half_width, height, half_width),
        )
    }

    /// Horizontal facing direction.
    pub fn forward_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.theta.sin_cos();
        Vec3::new(sin_yaw, 0.0, cos_yaw)
    }

    /// Horizontal strafe direction.
    pub fn right_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.theta.sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.phi.sin_cos();
        let (sin_yaw, cos_yaw) = self.theta.sin_cos();

        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }
}

/// Input command for a single integration step.
///
/// This is the player's intent reduced to numbers: which way to walk and
/// whether to jump. View angles are turned separately through
/// [`PlayerController::apply_look`](super::PlayerController::apply_look).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Forward/backward movement (-1.0 to 1.0).
    /// Positive = forward, negative = backward.
    pub forward_move: f32,

    /// Strafe left/right (-1.0 to 1.0).
    /// Positive = right, negative = left.
    pub right_move: f32,

    /// Jump was triggered since the last step.
    pub jump: bool,
}

impl PlayerCommand {
    /// Movement direction in local space (x = right, z = forward).
    ///
    /// Diagonals are normalized so two held directions are no faster than one.
    pub fn movement_direction(&self) -> Vec3 {
        let dir = Vec3::new(self.right_move, 0.0, self.forward_move);
        if dir.length_squared() > 1.0 {
            dir.normalize()
        } else if dir.length_squared() > 1e-4 {
            dir
        } else {
            Vec3::ZERO
        }
    }
}
