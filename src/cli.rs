//! Command-line interface
//!
//! Flags override the environment-derived `BattleConfig`.

use clap::Parser;
use std::path::PathBuf;

use crate::config::BattleConfig;
use crate::game::systems::spawn::SpawnMode;
use crate::roster::{Roster, RosterError};

/// Battle-royale simulator on a shrinking arena
#[derive(Parser, Debug)]
#[command(name = "arena-royale")]
#[command(about = "Battle-royale simulator on a shrinking arena")]
#[command(version)]
pub struct Args {
    /// Contender names (at least two)
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Read contenders from a file, one name per line
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub roster: Option<PathBuf>,

    /// Use a built-in roster (see --list-presets)
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Spawn mode: random, even, clusters, center or storm
    #[arg(long, value_name = "MODE")]
    pub spawn: Option<SpawnMode>,

    /// Seed for reproducible battles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pace the battle in real time instead of fast-forwarding
    #[arg(long)]
    pub realtime: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Print battle events as they happen
    #[arg(long)]
    pub events: bool,

    /// Viewport width the arena is sized for
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height the arena is sized for
    #[arg(long)]
    pub height: Option<f32>,

    /// Simulation ticks per second
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Give up after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// List built-in rosters and exit
    #[arg(long)]
    pub list_presets: bool,

    /// List spawn modes and exit
    #[arg(long)]
    pub list_modes: bool,
}

impl Args {
    /// Applies flag overrides on top of the loaded config
    pub fn apply(&self, config: &mut BattleConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(rate) = self.tick_rate {
            config.tick_rate = rate;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(mode) = self.spawn {
            config.spawn_mode = mode;
        }
        if self.realtime {
            config.realtime = true;
        }
    }

    /// Roster from the preset, the roster file, or the positional names, in that order
    pub fn roster(&self) -> Result<Roster, RosterError> {
        if let Some(preset) = &self.preset {
            return Roster::from_preset(preset);
        }
        if let Some(path) = &self.roster {
            return Roster::from_file(path);
        }
        Roster::from_names(&self.names)
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}
