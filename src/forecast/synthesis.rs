use anyhow::{Context, Result};
use chrono::TimeDelta;
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::fraction::Fraction;
use crate::config::ForecastSettings;
use crate::domain::{PlayerId, SyntheticMatch, Timestamp};

/// Two ranked players, `first` having the lower id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPairing {
    pub first: PlayerId,
    pub second: PlayerId,
}

/// A pairing with the forecast that `first` beats `second`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairingForecast {
    pub pairing: PlayerPairing,
    pub forecast: Fraction,
}

/// Source of identifiers for synthetic matches
pub trait MatchIdSource {
    fn next_id(&mut self) -> String;
}

/// Deterministic `prefix-N` identifiers
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("synthetic")
    }
}

impl MatchIdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Synthetic wins owed to the first player out of `games`
pub fn win_quota(fraction: f64, games: usize) -> usize {
    let wins = (games as f64 * fraction).round();
    (wins.max(0.0) as usize).min(games)
}

/// Bare (winner, loser) outcomes for one pairing: wins first, then losses
pub fn pairing_outcomes(forecast: &PairingForecast, games: usize) -> Vec<(PlayerId, PlayerId)> {
    let PlayerPairing { first, second } = forecast.pairing;
    let wins = win_quota(forecast.forecast.fraction, games);

    let mut outcomes = vec![(first, second); wins];
    outcomes.extend(std::iter::repeat_n((second, first), games - wins));
    outcomes
}

/// Round i takes the i-th outcome of every pairing, in pairing order
pub fn interleave(batches: &[Vec<(PlayerId, PlayerId)>], games: usize) -> Vec<(PlayerId, PlayerId)> {
    let mut interleaved = Vec::with_capacity(batches.len() * games);

    for round in 0..games {
        for batch in batches {
            if let Some(&outcome) = batch.get(round) {
                interleaved.push(outcome);
            }
        }
    }

    interleaved
}

/// Shuffled synthetic games for every pairing, one `synthetic_spacing_secs`
/// apart starting at `now`.
pub fn synthesize_matches<R: Rng + ?Sized>(
    forecasts: &[PairingForecast],
    settings: &ForecastSettings,
    rng: &mut R,
    ids: &mut dyn MatchIdSource,
    now: Timestamp,
) -> Result<Vec<SyntheticMatch>> {
    settings.validate()?;

    let games = settings.games_per_pairing;
    let batches: Vec<Vec<(PlayerId, PlayerId)>> = forecasts
        .iter()
        .map(|f| pairing_outcomes(f, games))
        .collect();

    let mut outcomes = interleave(&batches, games);
    outcomes.shuffle(rng);

    let spacing = TimeDelta::try_seconds(settings.synthetic_spacing_secs.max(1))
        .context("Synthetic spacing out of range")?;
    let mut synthetic = Vec::with_capacity(outcomes.len());
    let mut played_at = now;

    for (i, (winner, loser)) in outcomes.into_iter().enumerate() {
        if i > 0 {
            played_at = played_at
                .checked_add_signed(spacing)
                .context("Synthetic timeline runs past the supported date range")?;
        }
        synthetic.push(SyntheticMatch {
            id: ids.next_id(),
            winner,
            loser,
            played_at,
        });
    }

    info!(
        "Synthesized {} future matches across {} pairings",
        synthetic.len(),
        forecasts.len()
    );

    Ok(synthetic)
}
