//! Render snapshots.
//!
//! A snapshot is the complete renderable state for one tick, rebuilt from
//! scratch on every request. It owns its buffers, so a renderer can keep
//! reading one while the universe moves on.

use glam::Vec3;
use runner_physics::{HookState, MovementConfig};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::level::WorldGeometry;
use crate::mesh::{Mesh, MeshBuilder, Rgba};
use crate::player::Player;

const PLAYER_COLORS: [Rgba; 4] = [
    [0.2, 0.45, 0.95, 1.0],
    [0.95, 0.5, 0.15, 1.0],
    [0.25, 0.8, 0.35, 1.0],
    [0.7, 0.3, 0.85, 1.0],
];
const ROPE_COLOR: Rgba = [0.95, 0.95, 0.9, 1.0];
const ROPE_THICKNESS: f32 = 0.05;

/// Where the camera is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub theta: f32,
    pub phi: f32,
}

/// Flat geometry plus camera for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Three floats per vertex.
    pub positions: Vec<f32>,
    /// One RGBA color per quad face (four vertices).
    pub colors: Vec<f32>,
    /// Triangle list into `positions`.
    pub indices: Vec<u32>,
    pub camera: CameraPose,
}

impl Snapshot {
    pub fn cam_pos(&self) -> [f32; 3] {
        self.camera.position.to_array()
    }

    pub fn cam_theta(&self) -> f32 {
        self.camera.theta
    }

    pub fn cam_phi(&self) -> f32 {
        self.camera.phi
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.colors.len() / 4
    }

    /// Check the buffer invariants a renderer relies on.
    pub fn is_consistent(&self) -> bool {
        let vertices = self.vertex_count();
        self.positions.len() % 3 == 0
            && self.colors.len() % 4 == 0
            && self.indices.len() % 3 == 0
            && self.face_count() * 4 == vertices
            && self.indices.iter().all(|&i| (i as usize) < vertices)
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Assembles a [`Snapshot`] from the world and the roster.
///
/// The static world mesh comes first, then each player in slot order.
pub struct SnapshotBuilder<'a> {
    world: &'a WorldGeometry,
    players: &'a [Player],
    movement: &'a MovementConfig,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(world: &'a WorldGeometry, players: &'a [Player], movement: &'a MovementConfig) -> Self {
        Self {
            world,
            players,
            movement,
        }
    }

    /// Build a snapshot seen from `viewer`'s eye.
    pub fn build(&self, viewer: usize) -> Result<Snapshot> {
        let eye_player = self.players.get(viewer).ok_or(GameError::InvalidPlayer {
            index: viewer,
            count: self.players.len(),
        })?;

        let mut mesh = self.world.mesh().clone();
        for player in self.players {
            mesh.append(&self.player_mesh(player));
        }

        let camera = CameraPose {
            position: eye_player.eye_position(self.movement),
            theta: eye_player.movement.theta,
            phi: eye_player.movement.phi,
        };

        let Mesh {
            positions,
            colors,
            indices,
        } = mesh;
        Ok(Snapshot {
            positions,
            colors,
            indices,
            camera,
        })
    }

    fn player_mesh(&self, player: &Player) -> Mesh {
        let mut builder = MeshBuilder::new();
        let body = player
            .movement
            .body(self.movement.half_width, self.movement.height);
        builder.add_box(&body, PLAYER_COLORS[player.slot % PLAYER_COLORS.len()]);

        if let HookState::Attached { anchor, .. } | HookState::Pulling { anchor, .. } = player.hook_state() {
            if let Some(anchor) = self.world.collision().anchor(anchor) {
                builder.add_beam(
                    player.eye_position(self.movement),
                    anchor.position,
                    ROPE_THICKNESS,
                    ROPE_COLOR,
                );
            }
        }
        builder.build()
    }
}
