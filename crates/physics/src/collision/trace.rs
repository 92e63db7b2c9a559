//! Ray trace results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::world::PlatformId;

/// Result of a ray trace through the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the ray we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Point where the ray stopped.
    pub end_position: Vec3,

    /// Outward normal of the face that was hit. `None` on a miss.
    pub hit_normal: Option<Vec3>,

    /// Platform that was hit.
    pub platform: Option<PlatformId>,
}

impl TraceResult {
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            platform: None,
        }
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.platform.is_some()
    }
}
