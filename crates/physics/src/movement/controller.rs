//! Player movement controller.
//!
//! This is the main entry point for player movement. It takes input commands
//! and the hook constraint for the step and updates the movement state
//! through the collision world.

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags};
use crate::grapple::{rope, HookConstraint};

use super::config::MovementConfig;
use super::slide_move::{slide_move, MoveContacts};
use super::state::{MovementFlags, MovementState, PlayerCommand};

/// How far below a spawn point [`PlayerController::spawn_at`] looks for ground.
const SPAWN_DROP_SEARCH: f32 = 2.0;

/// Player movement controller.
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(MovementConfig::default());
/// let mut state = MovementState::new(spawn_position);
///
/// // Each step:
/// controller.update(&mut state, &command, HookConstraint::Free, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl PlayerController {
    /// Create a new player controller with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default())
    }

    /// Place a player at a spawn point.
    ///
    /// If there is ground a short distance below the spawn point the player
    /// is dropped onto it, otherwise the spawn position is used as-is.
    pub fn spawn_at(&self, state: &mut MovementState, spawn_pos: Vec3, world: &CollisionWorld) {
        *state = MovementState::new(spawn_pos);

        let trace = world.raycast(
            spawn_pos + Vec3::new(0.0, 0.01, 0.0),
            Vec3::NEG_Y,
            SPAWN_DROP_SEARCH,
            ContentFlags::MASK_PLAYER_SOLID,
        );
        if trace.hit_something() && trace.hit_normal == Some(Vec3::Y) {
            state.position.y = trace.end_position.y;
        }
        self.check_ground(state, world);
    }

    // ========================================================================
    // View Angles
    // ========================================================================

    /// Turn by `(yaw, pitch)` radians.
    ///
    /// Yaw wraps to `[0, 2π)`; pitch is clamped just short of straight up or
    /// down so the camera never flips.
    pub fn apply_look(&self, state: &mut MovementState, (yaw, pitch): (f32, f32)) {
        if yaw.is_finite() {
            state.theta = (state.theta + yaw).rem_euclid(std::f32::consts::TAU);
        }
        if pitch.is_finite() {
            let limit = self.config.pitch_limit;
            state.phi = (state.phi + pitch).clamp(-limit, limit);
        }
    }

    // ========================================================================
    // Integration
    // ========================================================================

    /// Integrate one step without touching the view angles.
    ///
    /// Returns the contacts made while moving. Non-positive or non-finite
    /// steps are ignored, and longer steps are clamped to
    /// [`MovementConfig::max_delta_time`]; see [`Self::step_length`].
    pub fn update(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        constraint: HookConstraint,
        world: &CollisionWorld,
        delta_time: f32,
    ) -> MoveContacts {
        let Some(delta_time) = self.step_length(delta_time) else {
            return MoveContacts::default();
        };

        self.check_ground(state, world);

        let reeling = matches!(constraint, HookConstraint::Reel { .. });
        if command.jump && state.flags.on_ground() && !reeling {
            self.do_jump(state);
        }

        if let HookConstraint::Reel {
            anchor,
            rate,
            min_distance,
            max_speed,
        } = constraint
        {
            let eye = state.eye_position(self.config.eye_height);
            state.velocity = rope::reel_velocity(eye, anchor, rate, min_distance, max_speed, delta_time);
            state.walk_velocity = Vec3::ZERO;
        } else {
            state.walk_velocity = self.locomotion_velocity(state, command);
            self.apply_gravity(state, delta_time);
            self.apply_friction(state, delta_time);
        }

        let displacement = (state.velocity + state.walk_velocity) * delta_time;
        let mut contacts = slide_move(
            world,
            &mut state.position,
            &mut state.velocity,
            displacement,
            &self.config,
        );

        if let HookConstraint::Rope { anchor, length } = constraint {
            let rope_contacts = self.enforce_rope(state, anchor, length, world);
            contacts.landed |= rope_contacts.landed;
            contacts.hit_ceiling |= rope_contacts.hit_ceiling;
            contacts.hit_wall |= rope_contacts.hit_wall;
        }

        // Re-check ground after movement
        self.check_ground(state, world);
        contacts
    }

    /// Time a step of `delta_time` actually integrates, or `None` if nothing.
    pub fn step_length(&self, delta_time: f32) -> Option<f32> {
        // Clamp delta time to prevent physics explosions
        (delta_time > 0.0).then(|| delta_time.min(self.config.max_delta_time))
    }

    /// Velocity contributed by held directions this step.
    ///
    /// Diagonals are normalized by [`PlayerCommand::movement_direction`].
    pub fn locomotion_velocity(&self, state: &MovementState, command: &PlayerCommand) -> Vec3 {
        let local = command.movement_direction();
        if local == Vec3::ZERO {
            return Vec3::ZERO;
        }
        (state.forward_direction() * local.z + state.right_direction() * local.x) * self.config.move_speed
    }

    // ========================================================================
    // Ground Detection
    // ========================================================================

    fn check_ground(&self, state: &mut MovementState, world: &CollisionWorld) {
        // Don't detect ground if we're moving upward (just jumped)
        if state.velocity.y > 0.0 {
            state.flags.set(MovementFlags::ON_GROUND, false);
            return;
        }

        let body = state.body(self.config.half_width, self.config.height);
        match world.support_height(&body, self.config.ground_tolerance) {
            Some(top) => {
                state.position.y = top;
                state.velocity.y = 0.0;
                state.flags.set(MovementFlags::ON_GROUND, true);
                state.flags.set(MovementFlags::JUMPING, false);
            }
            None => state.flags.set(MovementFlags::ON_GROUND, false),
        }
    }

    // ========================================================================
    // Forces
    // ========================================================================

    fn do_jump(&self, state: &mut MovementState) {
        state.velocity.y = self.config.jump_speed;
        state.flags.set(MovementFlags::ON_GROUND, false);
        state.flags.set(MovementFlags::JUMPING, true);
    }

    fn apply_gravity(&self, state: &mut MovementState, delta_time: f32) {
        if state.flags.on_ground() {
            return;
        }
        state.velocity.y -= self.config.gravity * delta_time;
        state.velocity.y = state.velocity.y.max(-self.config.terminal_velocity);
    }

    /// Decay carried horizontal momentum.
    fn apply_friction(&self, state: &mut MovementState, delta_time: f32) {
        let rate = if state.flags.on_ground() {
            self.config.ground_friction
        } else {
            self.config.air_drag
        };
        let keep = (-rate.max(0.0) * delta_time).exp();
        state.velocity.x *= keep;
        state.velocity.z *= keep;
    }

    /// Pull the eye back onto the rope sphere and drop outward velocity.
    fn enforce_rope(
        &self,
        state: &mut MovementState,
        anchor: Vec3,
        length: f32,
        world: &CollisionWorld,
    ) -> MoveContacts {
        let eye = state.eye_position(self.config.eye_height);
        let Some(correction) = rope::rope_correction(eye, anchor, length) else {
            return MoveContacts::default();
        };

        let contacts = slide_move(world, &mut state.position, &mut state.velocity, correction, &self.config);
        let eye = state.eye_position(self.config.eye_height);
        state.velocity = rope::remove_outward_velocity(state.velocity, eye, anchor);
        contacts
    }
}
