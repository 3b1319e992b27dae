//! Command-line interface for spyx_missions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpyX Missions - find the spy, one device, many agents
#[derive(Parser, Debug)]
#[command(name = "spyx_missions")]
#[command(about = "Pass-the-device spy party game for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(short, long, global = true, default_value = spyx_missions::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the database path from the config
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the terminal game
    Play,

    /// Print the stored roster in turn order
    Roster,

    /// Print the universes and worlds served by the configured provider
    Universes {
        /// Only list the worlds of this universe
        #[arg(long)]
        name: Option<String>,
    },

    /// Clear stored records
    Reset {
        /// Only clear the roster
        #[arg(long)]
        players_only: bool,
    },
}
