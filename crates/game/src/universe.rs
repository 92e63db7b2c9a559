//! The universe: root aggregate of a running level.
//!
//! The universe owns the static world and an arena of players addressed by
//! slot index. Collaborators only ever hold indices. All mutation goes
//! through [`Universe::update`] and the input recorders, which only touch
//! intents.

use runner_physics::{HookConfig, MovementConfig, PlayerController};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::input::{HookCommand, InputKind};
use crate::level::{LevelDef, WorldGeometry};
use crate::player::Player;
use crate::snapshot::{Snapshot, SnapshotBuilder};

/// Universe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Roster size.
    pub max_players: usize,

    /// Integration step in seconds. `None` integrates each update in one
    /// variable step of the elapsed time.
    pub fixed_step: Option<f32>,

    /// Most fixed steps a single update may run. Time beyond that is dropped.
    pub max_substeps: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Grappling hook configuration.
    pub hook: HookConfig,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            max_players: 2,
            fixed_step: Some(1.0 / 120.0),
            max_substeps: 8,
            movement: MovementConfig::default(),
            hook: HookConfig::default(),
        }
    }
}

impl UniverseConfig {
    /// Integrate exactly the elapsed time of each update, like a frame loop.
    pub fn variable_step() -> Self {
        Self {
            fixed_step: None,
            ..Default::default()
        }
    }

    /// Low gravity and a forgiving hook for learning a level's routes.
    pub fn practice() -> Self {
        Self {
            movement: MovementConfig::floaty(),
            hook: HookConfig::assisted(),
            ..Default::default()
        }
    }
}

/// Which players an update advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    All,
    Player(usize),
}

impl From<usize> for UpdateTarget {
    fn from(index: usize) -> Self {
        UpdateTarget::Player(index)
    }
}

/// A running level with its players.
#[derive(Debug)]
pub struct Universe {
    config: UniverseConfig,
    controller: PlayerController,
    world: WorldGeometry,
    players: Vec<Player>,
    tick: u64,
    winner: Option<usize>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// Default configuration on the default level.
    pub fn new() -> Self {
        Self::with_level(UniverseConfig::default(), &LevelDef::ascent())
    }

    /// Create a universe for a level with a full roster at the spawn points.
    pub fn with_level(config: UniverseConfig, level: &LevelDef) -> Self {
        let controller = PlayerController::new(config.movement.clone());
        let world = WorldGeometry::new(level);
        let players = (0..config.max_players)
            .map(|slot| Player::new(slot, world.spawn_point(slot), &controller, world.collision()))
            .collect();

        log::info!("universe started on level {} with {} players", world.name(), config.max_players);

        Self {
            config,
            controller,
            world,
            players,
            tick: 0,
            winner: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldGeometry {
        &self.world
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player> {
        self.players.get(index).ok_or(GameError::InvalidPlayer {
            index,
            count: self.players.len(),
        })
    }

    fn player_mut(&mut self, index: usize) -> Result<&mut Player> {
        let count = self.players.len();
        self.players
            .get_mut(index)
            .ok_or(GameError::InvalidPlayer { index, count })
    }

    /// Number of updates run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Slot of the first player to reach the goal.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn level_complete(&self) -> bool {
        self.winner.is_some()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Record a semantic input event for the next update.
    pub fn apply_input(&mut self, index: usize, kind: InputKind) -> Result<()> {
        self.player_mut(index)?.intent.apply(kind);
        Ok(())
    }

    /// Record an input event given as its raw code.
    pub fn apply_input_code(&mut self, index: usize, code: u8) -> Result<()> {
        let kind = InputKind::try_from(code)?;
        self.apply_input(index, kind)
    }

    /// Accumulate a mouse-look delta for the next update.
    pub fn apply_mouse_look(&mut self, index: usize, dx: f32, dy: f32) -> Result<()> {
        self.player_mut(index)?.intent.add_look(dx, dy);
        Ok(())
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advance the targeted players by `elapsed` seconds.
    ///
    /// Recorded intents are applied first (look, then hook requests in
    /// order), then the players are integrated and their hooks checked.
    /// Non-positive or non-finite elapsed times apply intents but integrate
    /// nothing.
    pub fn update(&mut self, target: UpdateTarget, elapsed: f32) -> Result<()> {
        let slots = match target {
            UpdateTarget::All => 0..self.players.len(),
            UpdateTarget::Player(index) => {
                self.player(index)?;
                index..index + 1
            }
        };

        for slot in slots {
            self.update_player(slot, elapsed);
        }

        self.tick += 1;
        Ok(())
    }

    fn update_player(&mut self, slot: usize, elapsed: f32) {
        let Self {
            config,
            controller,
            world,
            players,
            winner,
            ..
        } = self;
        let Some(player) = players.get_mut(slot) else {
            return;
        };
        let collision = world.collision();
        let sensitivity = controller.config.look_sensitivity;

        // Phase 1: intents
        let (dx, dy) = player.intent.take_look();
        controller.apply_look(&mut player.movement, (dx * sensitivity, dy * sensitivity));

        for request in player.intent.take_hook_commands() {
            match request {
                HookCommand::Cast => {
                    let eye = player.eye_position(&controller.config);
                    let direction = player.look_direction();
                    player.hook.cast(eye, direction, collision, &config.hook);
                }
                HookCommand::Pull => {
                    player.hook.pull();
                }
                HookCommand::Release => player.hook.release(),
            }
        }

        // Phase 2: integration
        let Some((step, count)) = plan_steps(config, &mut player.accumulator, elapsed) else {
            return;
        };
        // Variable steps may be longer than one integration covers
        let Some(integrated) = controller.step_length(step) else {
            return;
        };
        let jump = player.intent.take_jump();
        let mut command = player.intent.to_command(jump);

        for _ in 0..count {
            let constraint = player.hook.constraint(collision, &config.hook);
            let contacts =
                controller.update(&mut player.movement, &command, constraint, collision, step);
            command.jump = false;
            if contacts.any() {
                log::trace!("player {} contacts {:?}", slot, contacts);
            }

            let eye = player.eye_position(&controller.config);
            player.hook.end_of_tick(eye, integrated, collision, &config.hook);

            let body = player
                .movement
                .body(controller.config.half_width, controller.config.height);
            if winner.is_none() && world.touches_goal(&body) {
                log::info!("player {} reached the goal of {}", slot, world.name());
                *winner = Some(slot);
            }

            if player.position().y < world.kill_height() {
                player.respawn(controller, collision);
                break;
            }
        }

        log::trace!(
            "player {} at {:?} vel {:?} hook {:?}",
            slot,
            player.position(),
            player.velocity(),
            player.hook_state()
        );
    }

    /// Render snapshot seen from `viewer`.
    pub fn snapshot(&self, viewer: usize) -> Result<Snapshot> {
        SnapshotBuilder::new(&self.world, &self.players, &self.controller.config).build(viewer)
    }
}

/// Step length and count for one update, or `None` when nothing runs.
fn plan_steps(config: &UniverseConfig, accumulator: &mut f32, elapsed: f32) -> Option<(f32, u32)> {
    if !(elapsed > 0.0) || !elapsed.is_finite() {
        return None;
    }

    let Some(step) = config.fixed_step.filter(|s| *s > 0.0 && s.is_finite()) else {
        return Some((elapsed, 1));
    };

    *accumulator += elapsed;
    let available = (*accumulator / step).floor();
    let count = (available as u32).min(config.max_substeps);
    if available > config.max_substeps as f32 {
        log::debug!(
            "dropping {:.3}s of simulation time beyond {} steps",
            *accumulator - count as f32 * step,
            config.max_substeps
        );
        *accumulator = 0.0;
    } else {
        *accumulator -= count as f32 * step;
    }

    (count > 0).then_some((step, count))
}

// ============================================================================
// Tests
// ============================================================================
