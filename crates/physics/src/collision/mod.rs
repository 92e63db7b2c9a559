//! Collision queries against the static level.
//!
//! Levels are built from axis-aligned boxes. Player bodies are boxes too,
//! so every contact test reduces to interval overlap per axis.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The platforms and anchors of a level
//! - [`Aabb`]: Box volume used for platforms and bodies
//! - [`TraceResult`]: Output from a ray trace

mod aabb;
mod flags;
mod trace;
mod world;

pub use aabb::Aabb;
pub use flags::ContentFlags;
pub use trace::TraceResult;
pub use world::{Anchor, AnchorId, CollisionWorld, Platform, PlatformId};
