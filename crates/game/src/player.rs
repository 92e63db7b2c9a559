//! Player entity and state.

use glam::Vec3;
use runner_physics::{CollisionWorld, Grapple, HookState, MovementConfig, MovementState, PlayerController};
use serde::{Deserialize, Serialize};

use crate::input::Intent;

/// A player in the game.
///
/// Players live in the universe's roster and are addressed by slot index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Roster slot.
    pub slot: usize,

    /// Movement physics state.
    pub movement: MovementState,

    /// The player's one grappling hook.
    pub hook: Grapple,

    /// Inputs recorded since the last update.
    pub intent: Intent,

    /// Unsimulated time carried over to the next update (seconds).
    pub accumulator: f32,

    /// Where this player starts and respawns.
    pub spawn: Vec3,

    /// Times this player fell out of the level.
    pub respawns: u32,
}

impl Player {
    /// Create a new player standing at its spawn point.
    pub fn new(slot: usize, spawn: Vec3, controller: &PlayerController, world: &CollisionWorld) -> Self {
        let mut movement = MovementState::default();
        controller.spawn_at(&mut movement, spawn, world);
        Self {
            slot,
            movement,
            hook: Grapple::new(),
            intent: Intent::default(),
            accumulator: 0.0,
            spawn,
            respawns: 0,
        }
    }

    /// Get the player's current position (feet).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    /// Get the player's current carried velocity.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.movement.velocity
    }

    /// Get the player's eye position (for camera and casts).
    pub fn eye_position(&self, config: &MovementConfig) -> Vec3 {
        self.movement.eye_position(config.eye_height)
    }

    /// Get the direction the player is looking.
    #[inline]
    pub fn look_direction(&self) -> Vec3 {
        self.movement.look_direction()
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.movement.flags.on_ground()
    }

    #[inline]
    pub fn hook_state(&self) -> HookState {
        self.hook.state()
    }

    /// Put the player back at its spawn point with a fresh hook and no
    /// pending input.
    pub fn respawn(&mut self, controller: &PlayerController, world: &CollisionWorld) {
        log::debug!("player {} respawning at {:?}", self.slot, self.spawn);
        let (theta, phi) = (self.movement.theta, self.movement.phi);
        controller.spawn_at(&mut self.movement, self.spawn, world);
        self.movement.theta = theta;
        self.movement.phi = phi;
        self.hook.release();
        self.intent.clear();
        self.accumulator = 0.0;
        self.respawns += 1;
    }
}
