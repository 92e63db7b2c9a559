//! Runner Game Logic
//!
//! This crate contains the game simulation around the physics engine:
//!
//! - Input intents recorded per player slot
//! - Levels and the static world geometry built from them
//! - The [`Universe`] that owns the world and the player roster
//! - Render snapshots with flat position/color/index buffers
//! - The session mode cycle (menu, play, won)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Universe                            │
//! │  ┌─────────┐    ┌──────────────┐    ┌─────────────────────┐  │
//! │  │ Input   │───►│ Physics      │───►│ Snapshot            │  │
//! │  │ intents │    │ (movement,   │    │ (world mesh, player │  │
//! │  └─────────┘    │  grapple)    │    │  bodies, ropes)     │  │
//! │                 └──────────────┘    └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod input;
pub mod level;
pub mod mesh;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod universe;

// Re-export main types
pub use error::{GameError, Result};
pub use input::{Direction, DirectionSet, HookCommand, InputKind, Intent};
pub use level::{LevelDef, WorldGeometry};
pub use mesh::{Mesh, MeshBuilder};
pub use player::Player;
pub use session::{Mode, Session};
pub use snapshot::{CameraPose, Snapshot, SnapshotBuilder};
pub use universe::{Universe, UniverseConfig, UpdateTarget};

// Re-export physics types for convenience
pub use runner_physics::{
    Aabb, AnchorId, CastOutcome, CollisionWorld, ContentFlags, Grapple, HookConfig, HookState,
    MovementConfig, MovementState, PlayerCommand, PlayerController,
};
