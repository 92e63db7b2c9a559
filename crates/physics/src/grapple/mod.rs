//! Grappling hook.
//!
//! A hook cycles `Idle -> Attached -> Pulling -> Idle` for the lifetime of
//! its player. While attached it behaves as a rope of fixed length; while
//! pulling it reels the player in along an exponential distance curve.
//!
//! The state machine ([`Grapple`]) never touches player kinematics itself.
//! Each step it hands the controller a [`HookConstraint`] and, after the
//! step, checks whether the line has to be dropped.

mod config;
mod hook;
pub mod rope;

pub use config::HookConfig;
pub use hook::{CastOutcome, Grapple, HookConstraint, HookState};
