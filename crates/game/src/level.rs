//! Level catalogue and the static world built from it.

use glam::Vec3;
use runner_physics::{Aabb, Anchor, CollisionWorld, ContentFlags, Platform};
use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, MeshBuilder, Rgba};

/// Floats per block in level block data.
pub const BLOCK_STRIDE: usize = 6;

/// Spacing between the spawn points of consecutive player slots (meters, +X).
pub const SPAWN_SPACING: f32 = 1.5;

const PLATFORM_COLORS: [Rgba; 2] = [[0.55, 0.58, 0.62, 1.0], [0.42, 0.47, 0.52, 1.0]];
const GOAL_COLOR: Rgba = [1.0, 0.84, 0.0, 1.0];
const ANCHOR_COLOR: Rgba = [0.9, 0.2, 0.2, 1.0];
const ANCHOR_SIZE: f32 = 0.3;

/// Authored description of a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Display name.
    pub name: String,

    /// Solid platform boxes.
    pub blocks: Vec<Aabb>,

    /// Hook anchor points.
    pub anchors: Vec<Vec3>,

    /// Touching this box wins the level.
    pub goal: Option<Aabb>,

    /// Spawn point of slot 0.
    pub spawn: Vec3,

    /// Players whose feet drop below this height respawn.
    pub kill_height: f32,
}

impl LevelDef {
    /// Create an empty level.
    pub fn new(name: &str, spawn: Vec3) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
            anchors: Vec::new(),
            goal: None,
            spawn,
            kill_height: -20.0,
        }
    }

    /// Build a level from flat block data.
    ///
    /// Every six floats `origin.xyz, dims.xyz` make one block. Trailing
    /// floats that do not fill a block are ignored.
    pub fn from_block_data(name: &str, block_data: &[f32], spawn: Vec3) -> Self {
        let chunks = block_data.chunks_exact(BLOCK_STRIDE);
        if !chunks.remainder().is_empty() {
            log::warn!(
                "level {}: ignoring {} trailing floats in block data",
                name,
                chunks.remainder().len()
            );
        }

        let mut level = Self::new(name, spawn);
        level.blocks = chunks
            .map(|b| Aabb::from_origin_dims(Vec3::new(b[0], b[1], b[2]), Vec3::new(b[3], b[4], b[5])))
            .collect();
        level
    }

    pub fn with_block(mut self, origin: Vec3, dims: Vec3) -> Self {
        self.blocks.push(Aabb::from_origin_dims(origin, dims));
        self
    }

    pub fn with_anchor(mut self, position: Vec3) -> Self {
        self.anchors.push(position);
        self
    }

    pub fn with_goal(mut self, origin: Vec3, dims: Vec3) -> Self {
        self.goal = Some(Aabb::from_origin_dims(origin, dims));
        self
    }

    pub fn with_kill_height(mut self, kill_height: f32) -> Self {
        self.kill_height = kill_height;
        self
    }

    /// Climb with a gap that needs the hook.
    pub fn ascent() -> Self {
        #[rustfmt::skip]
        let block_data = [
            -10.0, -1.0, -10.0,   20.0, 1.0, 25.0,
            -10.0, 0.0, 10.0,     20.0, 5.0, 2.0,
            -4.0, 0.0, 6.0,       5.0, 1.5, 4.0,
            -3.25, 1.5, 7.0,      3.0, 1.5, 3.0,
            -2.25, 3.0, 8.0,      1.5, 1.0, 2.0,
            -10.0, 2.0, 25.0,     20.0, 1.0, 25.0,
            -5.0, 11.0, 18.0,     10.0, 1.0, 8.0,
            -7.0, 4.0, 35.0,      3.0, 0.3, 3.0,
            -7.0, 5.5, 39.5,      3.0, 0.3, 3.0,
            -7.0, 9.0, 47.0,      3.0, 3.0, 0.3,
            -7.0, 13.0, 49.5,     3.0, 0.3, 3.0,
            -1.5, 20.0, 55.0,     3.0, 0.3, 3.0,
            4.5, 15.0, 60.0,      3.0, 0.3, 6.0,
        ];

        Self::from_block_data("ascent", &block_data, Vec3::new(2.0, 1.5, -5.0))
            .with_goal(Vec3::new(4.5, 15.3, 64.0), Vec3::new(3.0, 3.0, 2.0))
            .with_anchor(Vec3::new(0.0, 11.0, 22.0))
            .with_anchor(Vec3::new(-5.5, 10.5, 47.0))
            .with_anchor(Vec3::new(0.0, 20.0, 56.5))
            .with_anchor(Vec3::new(6.0, 15.0, 61.0))
    }

    /// A single floor slab with nothing on it.
    pub fn flat() -> Self {
        Self::from_block_data(
            "flat",
            &[-10.0, -1.0, -10.0, 20.0, 1.0, 25.0],
            Vec3::new(2.0, 1.5, -5.0),
        )
    }

    /// All built-in levels in menu order.
    pub fn catalogue() -> Vec<LevelDef> {
        vec![Self::ascent(), Self::flat()]
    }

    /// Spawn point for a roster slot.
    pub fn spawn_point(&self, slot: usize) -> Vec3 {
        self.spawn + Vec3::new(SPAWN_SPACING * slot as f32, 0.0, 0.0)
    }
}

/// The static world of a running level.
///
/// Built once from a [`LevelDef`] and never mutated; only the snapshot mesh
/// derived from it changes between ticks.
#[derive(Debug, Clone)]
pub struct WorldGeometry {
    name: String,
    collision: CollisionWorld,
    goal: Option<Aabb>,
    mesh: Mesh,
    spawn: Vec3,
    kill_height: f32,
}

impl Default for WorldGeometry {
    fn default() -> Self {
        Self::new(&LevelDef::ascent())
    }
}

impl WorldGeometry {
    pub fn new(level: &LevelDef) -> Self {
        let mut collision = CollisionWorld::new();
        for block in &level.blocks {
            collision.add_platform(*block, ContentFlags::SOLID);
        }
        if let Some(goal) = level.goal {
            collision.add_platform(goal, ContentFlags::GOAL);
        }
        for &anchor in &level.anchors {
            collision.add_anchor(anchor);
        }

        let mesh = build_static_mesh(&collision);
        log::debug!(
            "built level {}: {} platforms, {} anchors, {} mesh faces",
            level.name,
            level.blocks.len(),
            collision.anchors().len(),
            mesh.face_count()
        );

        Self {
            name: level.name.clone(),
            collision,
            goal: level.goal,
            mesh,
            spawn: level.spawn,
            kill_height: level.kill_height,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Solid platforms, in authoring order.
    pub fn platforms(&self) -> impl Iterator<Item = &Platform> + '_ {
        self.collision
            .platforms()
            .iter()
            .filter(|p| p.contents.intersects(ContentFlags::SOLID))
    }

    /// Hook anchors, in authoring order.
    pub fn anchors(&self) -> &[Anchor] {
        self.collision.anchors()
    }

    /// Static renderable geometry of the level.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    pub fn goal(&self) -> Option<&Aabb> {
        self.goal.as_ref()
    }

    /// True when a body box touches the goal volume.
    pub fn touches_goal(&self, body: &Aabb) -> bool {
        !self.collision.overlapping(body, ContentFlags::GOAL).is_empty()
    }

    pub fn kill_height(&self) -> f32 {
        self.kill_height
    }

    /// Spawn point for a roster slot.
    pub fn spawn_point(&self, slot: usize) -> Vec3 {
        self.spawn + Vec3::new(SPAWN_SPACING * slot as f32, 0.0, 0.0)
    }
}

fn build_static_mesh(collision: &CollisionWorld) -> Mesh {
    let mut builder = MeshBuilder::new();
    let mut solid_index = 0;
    for platform in collision.platforms().iter().filter(|p| p.is_usable()) {
        if platform.contents.intersects(ContentFlags::SOLID) {
            builder.add_box(&platform.bounds, PLATFORM_COLORS[solid_index % PLATFORM_COLORS.len()]);
            solid_index += 1;
        } else if platform.contents.intersects(ContentFlags::GOAL) {
            builder.add_box(&platform.bounds, GOAL_COLOR);
        }
    }
    for anchor in collision.anchors() {
        builder.add_cube(anchor.position, ANCHOR_SIZE, ANCHOR_COLOR);
    }
    builder.build()
}
