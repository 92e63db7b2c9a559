//! Player input handling.
//!
//! The input layer delivers already-decoded semantic events. This module
//! records them against a player's [`Intent`], which the universe turns
//! into a [`PlayerCommand`] for the physics system at the next update.

use runner_physics::movement::PlayerCommand;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// The closed set of semantic input events.
///
/// Raw codes follow declaration order, `GoLeft = 0` through `Release = 11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InputKind {
    GoLeft = 0,
    GoForward = 1,
    GoRight = 2,
    GoBack = 3,
    StopLeft = 4,
    StopForward = 5,
    StopRight = 6,
    StopBack = 7,
    Jump = 8,
    Cast = 9,
    Pull = 10,
    Release = 11,
}

impl InputKind {
    pub const ALL: [InputKind; 12] = [
        InputKind::GoLeft,
        InputKind::GoForward,
        InputKind::GoRight,
        InputKind::GoBack,
        InputKind::StopLeft,
        InputKind::StopForward,
        InputKind::StopRight,
        InputKind::StopBack,
        InputKind::Jump,
        InputKind::Cast,
        InputKind::Pull,
        InputKind::Release,
    ];
}

impl TryFrom<u8> for InputKind {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        InputKind::ALL
            .get(code as usize)
            .copied()
            .ok_or(GameError::UnknownInput(code))
    }
}

/// A locomotion direction relative to the player's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Forward,
    Right,
    Back,
}

impl Direction {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            Direction::Left => 1 << 0,
            Direction::Forward => 1 << 1,
            Direction::Right => 1 << 2,
            Direction::Back => 1 << 3,
        }
    }
}

/// Set of held directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSet(u8);

impl DirectionSet {
    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        (self.0 & direction.bit()) != 0
    }

    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    #[inline]
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Local movement axes `(forward, right)`, each in `-1.0..=1.0`.
    ///
    /// Opposite directions cancel out.
    pub fn axes(self) -> (f32, f32) {
        let axis = |pos: Direction, neg: Direction| {
            (self.contains(pos) as i8 - self.contains(neg) as i8) as f32
        };
        (
            axis(Direction::Forward, Direction::Back),
            axis(Direction::Right, Direction::Left),
        )
    }
}

/// One-shot grappling hook requests, applied in the order received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookCommand {
    Cast,
    Pull,
    Release,
}

/// Everything a player asked for since the last update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Held directions. Persist across updates until stopped.
    pub directions: DirectionSet,

    /// A jump was triggered and not yet consumed.
    pub jump: bool,

    /// Hook requests not yet applied.
    pub hook_commands: Vec<HookCommand>,

    /// Accumulated mouse delta `(dx, dy)` in device units.
    pub look: (f32, f32),
}

impl Intent {
    /// Record one semantic event.
    pub fn apply(&mut self, kind: InputKind) {
        match kind {
            InputKind::GoLeft => self.directions.insert(Direction::Left),
            InputKind::GoForward => self.directions.insert(Direction::Forward),
            InputKind::GoRight => self.directions.insert(Direction::Right),
            InputKind::GoBack => self.directions.insert(Direction::Back),
            InputKind::StopLeft => self.directions.remove(Direction::Left),
            InputKind::StopForward => self.directions.remove(Direction::Forward),
            InputKind::StopRight => self.directions.remove(Direction::Right),
            InputKind::StopBack => self.directions.remove(Direction::Back),
            InputKind::Jump => self.jump = true,
            InputKind::Cast => self.hook_commands.push(HookCommand::Cast),
            InputKind::Pull => self.hook_commands.push(HookCommand::Pull),
            InputKind::Release => self.hook_commands.push(HookCommand::Release),
        }
    }

    /// Accumulate a mouse-look delta. Non-finite deltas are dropped.
    pub fn add_look(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.look.0 += dx;
            self.look.1 += dy;
        }
    }

    pub fn take_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look)
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn take_hook_commands(&mut self) -> Vec<HookCommand> {
        std::mem::take(&mut self.hook_commands)
    }

    /// Drop everything, held directions included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Physics command for the held directions.
    ///
    /// `jump` is passed in because the trigger is consumed separately with
    /// [`take_jump`](Self::take_jump). Look is not part of the command.
    pub fn to_command(&self, jump: bool) -> PlayerCommand {
        let (forward_move, right_move) = self.directions.axes();
        PlayerCommand {
            forward_move,
            right_move,
            jump,
        }
    }
}
