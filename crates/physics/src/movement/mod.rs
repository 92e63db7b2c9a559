//! Player movement physics system.
//!
//! This module implements runner movement with:
//!
//! - Fixed-speed locomotion in the facing frame, normalized on diagonals
//! - Gravity, one-shot jumps and terminal velocity
//! - Carried momentum that decays with ground friction or air drag
//! - Axis-separated box collision against platforms
//! - Rope and reel constraints supplied by the grappling hook
//!
//! # Design
//!
//! Movement is controlled by the [`PlayerController`] which takes input commands
//! and updates the player's [`MovementState`] through the collision world.
//!
//! All movement is deterministic: the same inputs and steps always produce
//! the same outputs.

mod config;
mod controller;
mod slide_move;
mod state;

pub use config::MovementConfig;
pub use controller::PlayerController;
pub use slide_move::{slide_move, MoveContacts};
pub use state::{MovementFlags, MovementState, PlayerCommand};
