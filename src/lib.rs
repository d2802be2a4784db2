pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forecast;

use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use log::info;
use serde::Serialize;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::domain::{Timestamp, load_matches, parse_date_string};
use crate::forecast::{Forecaster, Granularity, GranularityForecast, PairForecast};

pub fn interpret() -> Cli {
    Cli::parse()
}

fn parse_as_of(as_of: Option<&str>) -> Result<Option<Timestamp>> {
    as_of.map(parse_date_string).transpose()
}

fn prepare(
    forecaster: &mut Forecaster,
    matches_path: &Path,
    as_of: Option<&str>,
) -> Result<()> {
    let matches = load_matches(matches_path)?;

    match parse_as_of(as_of)? {
        Some(reference) => {
            info!("Forecasting as of {}", reference);
            forecaster.forecast_as_of(&matches, reference);
        }
        None => {
            forecaster.reset_and_rebuild(&matches);
            forecaster.forecast_all_ranked_pairings();
        }
    }

    Ok(())
}

pub fn handle_pairings(config: &AppConfig, matches_path: &Path, as_of: Option<&str>) -> Result<()> {
    let mut forecaster = Forecaster::new(config.forecast.clone());
    prepare(&mut forecaster, matches_path, as_of)?;

    let pairings = forecaster.ranked_pairings();
    info!("{} ranked pairings", pairings.len());

    println!("{:>10} {:>10} {:>9} {:>10}", "player", "opponent", "win prob", "confidence");
    for pairing in pairings {
        let forecast = forecaster.forecast(pairing.first, pairing.second);
        if forecast.is_unknown() {
            println!("{:>10} {:>10} {:>9} {:>10}", pairing.first, pairing.second, "-", "-");
            continue;
        }
        println!(
            "{:>10} {:>10} {:>9.3} {:>10.3}",
            pairing.first, pairing.second, forecast.fraction, forecast.confidence
        );
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairReport {
    player_a: i64,
    player_b: i64,
    forecast: PairForecast,
    game: Option<GranularityForecast>,
    set: Option<GranularityForecast>,
    point: Option<GranularityForecast>,
}

pub fn handle_pair(
    config: &AppConfig,
    matches_path: &Path,
    player_a: i64,
    player_b: i64,
    as_of: Option<&str>,
) -> Result<()> {
    let mut forecaster = Forecaster::new(config.forecast.clone());
    prepare(&mut forecaster, matches_path, as_of)?;

    let report = PairReport {
        player_a,
        player_b,
        forecast: forecaster.forecast_breakdown(player_a, player_b),
        game: forecaster.granularity_forecast(player_a, player_b, Granularity::Game),
        set: forecaster.granularity_forecast(player_a, player_b, Granularity::Set),
        point: forecaster.granularity_forecast(player_a, player_b, Granularity::Point),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn handle_synthesize(config: &AppConfig, matches_path: &Path, seed: Option<u64>) -> Result<()> {
    let matches = load_matches(matches_path)?;
    let mut forecaster = match seed {
        Some(seed) => Forecaster::seeded(config.forecast.clone(), seed),
        None => Forecaster::new(config.forecast.clone()),
    };

    let synthetic = forecaster.synthesize_future_matches(&matches)?;

    println!("{}", serde_json::to_string_pretty(&synthetic)?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
