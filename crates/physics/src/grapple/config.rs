//! Grappling hook tuning.

use serde::{Deserialize, Serialize};

/// Configuration for the grappling hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Maximum eye-to-anchor distance for a cast to attach (meters).
    pub cast_range: f32,

    /// Maximum angle between the look direction and an anchor (radians).
    pub cast_angle_tolerance: f32,

    /// Exponential decay rate of the anchor distance while pulling (1/s).
    pub pull_rate: f32,

    /// Pulling stops reeling in at this distance (meters).
    pub min_distance: f32,

    /// Upper bound on the reel-in speed (meters/second).
    pub max_pull_speed: f32,

    /// An attached hook snaps when the anchor gets further than this (meters).
    pub break_distance: f32,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            cast_range: 20.0,
            cast_angle_tolerance: 0.12,
            pull_rate: 2.5,
            min_distance: 1.0,
            max_pull_speed: 30.0,
            break_distance: 40.0,
        }
    }
}

impl HookConfig {
    /// A forgiving hook with a wide aim cone and a fast reel.
    pub fn assisted() -> Self {
        Self {
            cast_range: 25.0,
            cast_angle_tolerance: 0.3,
            pull_rate: 4.0,
            ..Default::default()
        }
    }

    /// Seconds of pulling needed to cover a fraction of the starting distance.
    ///
    /// Ignores the speed cap and the minimum distance.
    pub fn time_to_close(&self, fraction: f32) -> f32 {
        if self.pull_rate <= 0.0 || !(0.0..1.0).contains(&fraction) {
            return f32::INFINITY;
        }
        -(1.0 - fraction).ln() / self.pull_rate
    }
}
