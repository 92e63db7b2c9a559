//! Session: level catalogue and the menu/play/won mode cycle.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::level::LevelDef;
use crate::universe::{Universe, UniverseConfig};

/// What the front end should be showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Menu,
    Play,
    WonLevel,
}

/// Owns the levels and decides which mode the game is in.
///
/// The session hands out a fresh [`Universe`] per level start; the caller
/// owns it and reports back through [`Session::observe`].
#[derive(Debug, Clone)]
pub struct Session {
    levels: Vec<LevelDef>,
    mode: Mode,
    current: Option<usize>,
    config: UniverseConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(UniverseConfig::default())
    }
}

impl Session {
    /// A session over the built-in levels.
    pub fn new(config: UniverseConfig) -> Self {
        Self::with_levels(config, LevelDef::catalogue())
    }

    pub fn with_levels(config: UniverseConfig, levels: Vec<LevelDef>) -> Self {
        Self {
            levels,
            mode: Mode::Menu,
            current: None,
            config,
        }
    }

    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Index of the level most recently started.
    pub fn current_level(&self) -> Option<usize> {
        self.current
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            log::debug!("session mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Build a universe for a level and enter play.
    pub fn start(&mut self, level: usize) -> Result<Universe> {
        let def = self.levels.get(level).ok_or(GameError::UnknownLevel {
            index: level,
            count: self.levels.len(),
        })?;
        let universe = Universe::with_level(self.config.clone(), def);
        self.current = Some(level);
        self.set_mode(Mode::Play);
        Ok(universe)
    }

    /// Follow the universe's progress. Play turns into `WonLevel` once
    /// somebody reaches the goal. Returns the mode afterwards.
    pub fn observe(&mut self, universe: &Universe) -> Mode {
        if self.mode == Mode::Play && universe.level_complete() {
            self.set_mode(Mode::WonLevel);
        }
        self.mode
    }
}
