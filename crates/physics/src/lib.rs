//! Runner Physics Engine
//!
//! Deterministic kinematics for a platform runner with a grappling hook.
//! Levels are axis-aligned boxes, players are boxes, and every step is a
//! pure function of the previous state, the command and the step length.
//!
//! # Architecture
//!
//! The physics engine is split into three systems:
//!
//! - **Collision**: Platform and anchor storage with ray, support and overlap queries
//! - **Movement**: Uses collision queries to integrate player motion
//! - **Grapple**: The hook state machine and the constraints it places on movement

pub mod collision;
pub mod grapple;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    Aabb, Anchor, AnchorId, CollisionWorld, ContentFlags, Platform, PlatformId, TraceResult,
};
pub use grapple::{CastOutcome, Grapple, HookConfig, HookConstraint, HookState};
pub use movement::{
    MoveContacts, MovementConfig, MovementFlags, MovementState, PlayerCommand, PlayerController,
};
