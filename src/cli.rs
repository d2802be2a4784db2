use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "league-forecast: head-to-head forecasts for a ladder league")]
pub struct Cli {
    /// JSON settings file (optional, defaults are used otherwise)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Forecast every pairing of ranked players
    Pairings {
        /// JSON array of recorded matches
        #[arg(short, long)]
        matches: PathBuf,
        /// Pin the forecast to a past instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Show every forecast stage for one pair of players
    Pair {
        #[arg(short, long)]
        matches: PathBuf,
        player_a: i64,
        player_b: i64,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Generate synthetic future matches as JSON
    Synthesize {
        #[arg(short, long)]
        matches: PathBuf,
        /// Fixed shuffle seed for reproducible ordering
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}
