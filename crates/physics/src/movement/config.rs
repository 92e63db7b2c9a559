//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. The classic
//! values reproduce the original per-frame tuning of the runner at 60 Hz
//! expressed in per-second units.

use serde::{Deserialize, Serialize};

/// Configuration for player movement physics.
///
/// All values use metric units (meters, seconds) unless otherwise noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Player Dimensions
    // ========================================================================
    /// Half of the body box width on X and Z (meters).
    pub half_width: f32,

    /// Body box height (meters).
    pub height: f32,

    /// Eye height above the feet (meters).
    pub eye_height: f32,

    // ========================================================================
    // Movement
    // ========================================================================
    /// Locomotion speed while a direction is held (meters/second).
    pub move_speed: f32,

    /// Upward velocity given by a jump (meters/second).
    pub jump_speed: f32,

    /// Gravity acceleration (meters/second²).
    pub gravity: f32,

    /// Maximum falling speed (meters/second).
    pub terminal_velocity: f32,

    /// Rate at which carried horizontal momentum decays on the ground (1/s).
    pub ground_friction: f32,

    /// Rate at which carried horizontal momentum decays in the air (1/s).
    pub air_drag: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Vertical distance within which a platform top counts as support.
    pub ground_tolerance: f32,

    /// Longest step a single integration may take (seconds).
    pub max_delta_time: f32,

    // ========================================================================
    // Look
    // ========================================================================
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` radians.
    pub pitch_limit: f32,

    /// Radians of rotation per unit of mouse delta.
    pub look_sensitivity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl MovementConfig {
    /// The original runner feel: quick strafing, high jumps, heavy gravity.
    pub fn classic() -> Self {
        Self {
            half_width: 0.25,
            height: 1.6,
            eye_height: 1.4,

            move_speed: 6.0,      // 0.1 per frame
            jump_speed: 15.0,     // 0.25 per frame, ~2m apex
            gravity: 54.0,        // 0.015 per frame²
            terminal_velocity: 60.0,
            ground_friction: 10.0,
            air_drag: 0.1,

            ground_tolerance: 0.05,
            max_delta_time: 0.066,

            pitch_limit: std::f32::consts::FRAC_PI_2 - 0.01,
            look_sensitivity: 0.0008,
        }
    }

    /// Lower gravity and longer air time, handy for practising hook routes.
    pub fn floaty() -> Self {
        Self {
            gravity: 20.0,
            jump_speed: 9.0,
            terminal_velocity: 25.0,
            air_drag: 0.02,
            ..Self::classic()
        }
    }

    /// Height of a jump apex above the take-off point (meters).
    pub fn jump_apex(&self) -> f32 {
        if self.gravity > 0.0 {
            self.jump_speed * self.jump_speed / (2.0 * self.gravity)
        } else {
            f32::INFINITY
        }
    }
}
