//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{
    GameConfig, DEFAULT_MAX_INITIAL_COINS, DEFAULT_SPAWN_PROBABILITY, DEFAULT_TILE_WIDTH,
    DEFAULT_VISIBILITY_RADIUS,
};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::world::LatLng;
use crate::flows::play::{Direction, TransferKind};

/// Longest walk a single `move` accepts
pub const MAX_STEPS: u32 = 1000;

/// geocoin - collect coins from caches scattered over a map grid.
#[derive(Parser, Debug)]
#[command(name = "geocoin")]
#[command(
    author,
    version,
    about,
    long_about = r#"geocoin keeps a persistent game session under ROOT/.geocoin/.

Every command restores the session, applies one action, saves the session and
prints a ResultSet in the selected format (default: jsonl).

Caches are placed deterministically: the same grid cell always hosts the same
cache with the same starting coins, no matter where the player comes from.

Examples:
    geocoin look
    geocoin move north --steps 3
    geocoin withdraw 369896,-1220626
    geocoin deposit 369896,-1220626 --count 2
    geocoin goto 36.9895 -122.0628
    geocoin reset
"#
)]
pub struct Cli {
    /// Directory holding the .geocoin session.
    #[arg(long, global = true, default_value = ".", value_name = "ROOT")]
    pub root: PathBuf,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    /// Width of one grid cell in degrees.
    #[arg(long, global = true, env = "GEOCOIN_TILE_WIDTH", default_value_t = DEFAULT_TILE_WIDTH)]
    pub tile_width: f64,

    /// Cells visible in each direction around the player.
    #[arg(long, global = true, env = "GEOCOIN_RADIUS", default_value_t = DEFAULT_VISIBILITY_RADIUS)]
    pub radius: i64,

    /// Chance that a cell hosts a cache.
    #[arg(
        long,
        global = true,
        env = "GEOCOIN_SPAWN_PROBABILITY",
        default_value_t = DEFAULT_SPAWN_PROBABILITY
    )]
    pub spawn_probability: f64,

    /// Upper bound (exclusive) on a new cache's coins.
    #[arg(
        long,
        global = true,
        env = "GEOCOIN_MAX_COINS",
        default_value_t = DEFAULT_MAX_INITIAL_COINS
    )]
    pub max_coins: u32,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Game configuration from the global flags
    pub fn game_config(&self) -> Result<GameConfig> {
        let config = GameConfig {
            tile_width: self.tile_width,
            visibility_radius: self.radius,
            spawn_probability: self.spawn_probability,
            max_initial_coins: self.max_coins,
            ..GameConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the player and every cache in view.
    Look,

    /// Summarize the session (position, inventory, cache counts).
    Status,

    /// Walk one or more tiles in a direction.
    #[command(long_about = "Walk STEPS tiles in DIRECTION. Each step is recorded on the\n\
movement trail and refreshes the caches in view.\n\n\
Examples:\n\
  geocoin move north\n\
  geocoin move west --steps 4\n")]
    Move {
        #[arg(value_enum, value_name = "DIRECTION")]
        direction: Direction,

        /// Number of tiles to walk (1 to 1000).
        #[arg(
            long,
            default_value = "1",
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..=MAX_STEPS as i64)
        )]
        steps: u32,
    },

    /// Jump to an absolute position (e.g. a geolocation fix).
    #[command(allow_negative_numbers = true)]
    Goto {
        #[arg(value_name = "LAT")]
        lat: f64,

        #[arg(value_name = "LNG")]
        lng: f64,
    },

    /// Take coins from a cache in view.
    #[command(long_about = "Move the most recently added coin of the cache at KEY into the\n\
player's inventory, up to COUNT times. KEY is the cell key `x,y`.\n\n\
Example:\n\
  geocoin withdraw 369896,-1220626 --count 2\n")]
    Withdraw {
        #[arg(value_name = "KEY", allow_hyphen_values = true)]
        key: String,

        /// Number of coins to move.
        #[arg(long, default_value = "1", value_name = "N")]
        count: u32,
    },

    /// Give coins to a cache in view.
    #[command(long_about = "Move the player's most recently collected coin into the cache at\n\
KEY, up to COUNT times. KEY is the cell key `x,y`.\n")]
    Deposit {
        #[arg(value_name = "KEY", allow_hyphen_values = true)]
        key: String,

        /// Number of coins to move.
        #[arg(long, default_value = "1", value_name = "N")]
        count: u32,
    },

    /// Delete the saved session and start over at the origin.
    Reset,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let config = cli.game_config()?;
    let root = cli.root.as_path();

    match cli.command {
        Commands::Look => crate::flows::play::run_look(root, config, render_config),

        Commands::Status => crate::flows::play::run_status(root, config, render_config),

        Commands::Move { direction, steps } => {
            crate::flows::play::run_move(root, direction, steps, config, render_config)
        }

        Commands::Goto { lat, lng } => {
            crate::flows::play::run_goto(root, LatLng::new(lat, lng), config, render_config)
        }

        Commands::Withdraw { ref key, count } => crate::flows::play::run_transfer(
            root,
            TransferKind::Withdraw,
            key,
            count,
            config,
            render_config,
        ),

        Commands::Deposit { ref key, count } => crate::flows::play::run_transfer(
            root,
            TransferKind::Deposit,
            key,
            count,
            config,
            render_config,
        ),

        Commands::Reset => crate::flows::play::run_reset(root, config, render_config),
    }
}
