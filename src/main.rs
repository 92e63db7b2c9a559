//! Runner - headless driver.
//!
//! Plays a scripted input sequence against a level, logs progress and can
//! write the final render snapshot as JSON for a renderer to pick up.
//!
//! ```text
//! RUST_LOG=info runner --level 0 --ticks 900 --snapshot frame.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use runner_game::{InputKind, Mode, Session, Universe, UniverseConfig, UpdateTarget};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "runner", about = "Run the grappling-hook runner simulation headless")]
struct Args {
    /// Level index in the built-in catalogue (0 = ascent, 1 = flat).
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// Number of updates to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Elapsed seconds passed to each update.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Universe configuration as JSON. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the practice tuning (low gravity, forgiving hook)
    /// instead of the classic one. A `--config` file overrides it.
    #[arg(long)]
    practice: bool,

    /// Input script as JSON. Defaults to a short built-in demo.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the last snapshot to this file as JSON.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Player whose eye the snapshot uses.
    #[arg(long, default_value_t = 0)]
    viewer: usize,

    /// Log player state every this many updates.
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

/// One scripted event, applied just before the update of `tick`.
#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    tick: u64,
    player: usize,
    #[serde(default)]
    input: Option<InputKind>,
    #[serde(default)]
    look: Option<(f32, f32)>,
}

impl ScriptStep {
    fn input(tick: u64, player: usize, kind: InputKind) -> Self {
        Self {
            tick,
            player,
            input: Some(kind),
            look: None,
        }
    }

    fn look(tick: u64, player: usize, dx: f32, dy: f32) -> Self {
        Self {
            tick,
            player,
            input: None,
            look: Some((dx, dy)),
        }
    }
}

/// Walk up the first steps of the ascent, then try the hook.
fn demo_script() -> Vec<ScriptStep> {
    use InputKind::*;
    vec![
        ScriptStep::input(0, 0, GoForward),
        ScriptStep::look(0, 0, -1200.0, 0.0),
        ScriptStep::input(40, 0, Jump),
        ScriptStep::input(70, 0, Jump),
        ScriptStep::input(100, 0, Jump),
        ScriptStep::look(130, 0, 0.0, -500.0),
        ScriptStep::input(131, 0, Cast),
        ScriptStep::input(132, 0, Pull),
        ScriptStep::input(220, 0, Release),
        ScriptStep::input(220, 0, StopForward),
        ScriptStep::input(0, 1, GoLeft),
        ScriptStep::input(60, 1, StopLeft),
        ScriptStep::input(61, 1, Jump),
    ]
}

fn load_config(path: &Path) -> Result<UniverseConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
}

fn apply_step(universe: &mut Universe, step: &ScriptStep) -> Result<()> {
    if let Some(kind) = step.input {
        universe
            .apply_input(step.player, kind)
            .with_context(|| format!("script tick {}", step.tick))?;
    }
    if let Some((dx, dy)) = step.look {
        universe
            .apply_mouse_look(step.player, dx, dy)
            .with_context(|| format!("script tick {}", step.tick))?;
    }
    Ok(())
}

fn report(universe: &Universe) {
    for player in universe.players() {
        log::info!(
            "tick {:>5} player {} pos ({:6.2}, {:6.2}, {:6.2}) grounded {} hook {:?}",
            universe.tick(),
            player.slot,
            player.position().x,
            player.position().y,
            player.position().z,
            player.is_grounded(),
            player.hook_state(),
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None if args.practice => UniverseConfig::practice(),
        None => UniverseConfig::default(),
    };
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => demo_script(),
    };

    let mut session = Session::new(config);
    let mut universe = session.start(args.level)?;

    for tick in 0..args.ticks {
        for step in script.iter().filter(|s| s.tick == tick) {
            apply_step(&mut universe, step)?;
        }

        universe.update(UpdateTarget::All, args.dt)?;

        if args.report_every > 0 && tick % args.report_every == 0 {
            report(&universe);
        }
        if session.observe(&universe) == Mode::WonLevel {
            log::info!("level won by player {:?} at tick {}", universe.winner(), tick);
            break;
        }
    }
    report(&universe);

    let snapshot = universe.snapshot(args.viewer)?;
    println!(
        "ran {} updates on level {}: {} vertices, {} faces, camera at {:?}",
        universe.tick(),
        universe.world().name(),
        snapshot.vertex_count(),
        snapshot.face_count(),
        snapshot.cam_pos(),
    );

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string(&snapshot)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("snapshot written to {}", path.display());
    }

    Ok(())
}
