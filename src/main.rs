use anyhow::Result;

use league_forecast::cli::{Cli, Command};
use league_forecast::config::AppConfig;
use league_forecast::{
    handle_completions, handle_pair, handle_pairings, handle_synthesize, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Pairings { matches, as_of } => handle_pairings(&config, matches, as_of.as_deref()),
        Command::Pair {
            matches,
            player_a,
            player_b,
            as_of,
        } => handle_pair(&config, matches, *player_a, *player_b, as_of.as_deref()),
        Command::Synthesize { matches, seed } => handle_synthesize(&config, matches, *seed),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
