use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::calibration::Granularity;
use super::evidence::GranularityForecast;
use super::fraction::Fraction;
use super::graph::InteractionGraph;
use super::session::{ForecastSession, PairForecast};
use super::synthesis::{
    MatchIdSource, PairingForecast, PlayerPairing, SequentialIds, synthesize_matches,
};
use crate::config::ForecastSettings;
use crate::domain::{HistoricalMatch, PlayerId, SyntheticMatch, Timestamp};

/// Entry point for reporting consumers: rebuild from a match list, query
/// pairwise forecasts, synthesize future matches.
pub struct Forecaster<R = StdRng> {
    settings: ForecastSettings,
    session: Option<ForecastSession>,
    predicted_matches: Vec<SyntheticMatch>,
    rng: R,
    ids: Box<dyn MatchIdSource>,
}

impl Forecaster<StdRng> {
    /// Shuffles synthetic games with fresh entropy every run
    pub fn new(settings: ForecastSettings) -> Self {
        Self::with_sources(settings, StdRng::from_entropy(), Box::new(SequentialIds::default()))
    }

    /// Reproducible synthetic ordering
    pub fn seeded(settings: ForecastSettings, seed: u64) -> Self {
        Self::with_sources(
            settings,
            StdRng::seed_from_u64(seed),
            Box::new(SequentialIds::default()),
        )
    }
}

impl<R: RngCore> Forecaster<R> {
    pub fn with_sources(settings: ForecastSettings, rng: R, ids: Box<dyn MatchIdSource>) -> Self {
        Self {
            settings,
            session: None,
            predicted_matches: Vec::new(),
            rng,
            ids,
        }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    /// Drops the graph and every cached fraction
    pub fn reset(&mut self) {
        self.session = None;
    }

    pub fn setup(&mut self, matches: &[HistoricalMatch]) {
        self.start_session(InteractionGraph::build(matches), None);
    }

    /// Like `setup`, skipping matches that name players outside `roster`
    pub fn setup_with_roster(&mut self, matches: &[HistoricalMatch], roster: &[PlayerId]) {
        self.start_session(InteractionGraph::build_with_roster(matches, Some(roster)), None);
    }

    pub fn reset_and_rebuild(&mut self, matches: &[HistoricalMatch]) {
        self.reset();
        self.setup(matches);
    }

    fn start_session(&mut self, graph: InteractionGraph, as_of: Option<Timestamp>) {
        self.predicted_matches.clear();
        self.session = Some(ForecastSession::new(graph, self.settings.half_life_days, as_of));
    }

    /// Index pairs of every two ranked players, lower index first
    fn ranked_index_pairs(&self) -> Vec<(usize, usize)> {
        let Some(session) = &self.session else {
            return Vec::new();
        };

        let ranked = session.graph().ranked_players(self.settings.min_games_for_ranked);
        ranked
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| ranked[i + 1..].iter().map(move |&b| (a, b)))
            .collect()
    }

    pub fn ranked_pairings(&self) -> Vec<PlayerPairing> {
        let Some(session) = &self.session else {
            return Vec::new();
        };

        self.ranked_index_pairs()
            .into_iter()
            .map(|(a, b)| PlayerPairing {
                first: session.graph().player(a).id,
                second: session.graph().player(b).id,
            })
            .collect()
    }

    pub fn forecast_all_ranked_pairings(&mut self) {
        let pairs = self.ranked_index_pairs();

        match self.session.as_mut() {
            Some(session) => session.run_multi_hop_passes(&pairs),
            None => debug!("No session set up; nothing to forecast"),
        }
    }

    /// Rebuilds from the matches played by `reference` and forecasts every
    /// ranked pairing as of that instant.
    pub fn forecast_as_of(&mut self, matches: &[HistoricalMatch], reference: Timestamp) {
        let played: Vec<HistoricalMatch> = matches
            .iter()
            .filter(|m| m.played_at <= reference)
            .cloned()
            .collect();

        self.reset();
        self.start_session(InteractionGraph::build(&played), Some(reference));
        self.forecast_all_ranked_pairings();
    }

    fn indices(&self, a: PlayerId, b: PlayerId) -> Option<(usize, usize)> {
        let graph = self.session.as_ref()?.graph();
        Some((graph.index_of(a)?, graph.index_of(b)?))
    }

    /// Final combined estimate that `a` beats `b`
    pub fn forecast(&mut self, a: PlayerId, b: PlayerId) -> Fraction {
        self.forecast_breakdown(a, b).combined
    }

    pub fn forecast_breakdown(&mut self, a: PlayerId, b: PlayerId) -> PairForecast {
        match (self.indices(a, b), self.session.as_mut()) {
            (Some((ia, ib)), Some(session)) => session.breakdown(ia, ib),
            _ => PairForecast {
                direct: Fraction::UNKNOWN,
                one_hop: Fraction::UNKNOWN,
                two_hop: Fraction::UNKNOWN,
                combined: Fraction::UNKNOWN,
            },
        }
    }

    /// Uncombined view at one granularity, for display
    pub fn granularity_forecast(
        &self,
        a: PlayerId,
        b: PlayerId,
        granularity: Granularity,
    ) -> Option<GranularityForecast> {
        let (ia, ib) = self.indices(a, b)?;
        self.session.as_ref()?.granularity(ia, ib, granularity)
    }

    pub fn synthesize_future_matches(
        &mut self,
        matches: &[HistoricalMatch],
    ) -> Result<Vec<SyntheticMatch>> {
        self.synthesize_future_matches_at(matches, Utc::now())
    }

    /// Rebuild, forecast, synthesize and reset. The result is also kept as
    /// `predicted_matches` until the next rebuild.
    pub fn synthesize_future_matches_at(
        &mut self,
        matches: &[HistoricalMatch],
        now: Timestamp,
    ) -> Result<Vec<SyntheticMatch>> {
        self.settings.validate()?;
        self.reset_and_rebuild(matches);
        self.forecast_all_ranked_pairings();

        let pairings = self.ranked_pairings();
        let forecasts: Vec<PairingForecast> = pairings
            .into_iter()
            .map(|pairing| PairingForecast {
                pairing,
                forecast: self.forecast(pairing.first, pairing.second),
            })
            .collect();

        let synthetic = synthesize_matches(
            &forecasts,
            &self.settings,
            &mut self.rng,
            self.ids.as_mut(),
            now,
        );
        self.reset();

        let synthetic = synthetic?;
        self.predicted_matches = synthetic.clone();
        info!("Kept {} predicted matches", self.predicted_matches.len());

        Ok(synthetic)
    }

    pub fn predicted_matches(&self) -> &[SyntheticMatch] {
        &self.predicted_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn games(winner: PlayerId, loser: PlayerId, count: usize, offset_days: i64) -> Vec<HistoricalMatch> {
        (0..count)
            .map(|i| {
                HistoricalMatch::new(
                    winner,
                    loser,
                    start() + Duration::days(offset_days) + Duration::minutes(i as i64),
                )
            })
            .collect()
    }

    fn settings(min_games: usize) -> ForecastSettings {
        ForecastSettings {
            min_games_for_ranked: min_games,
            ..ForecastSettings::default()
        }
    }

    #[test]
    fn test_unknown_players_degrade_to_unknown() {
        let mut forecaster = Forecaster::seeded(settings(1), 1);

        assert_eq!(forecaster.forecast(1, 2), Fraction::UNKNOWN);

        forecaster.setup(&games(1, 2, 3, 0));

        assert_eq!(forecaster.forecast(1, 99), Fraction::UNKNOWN);
        assert!(forecaster.granularity_forecast(1, 99, Granularity::Game).is_none());
        assert!(forecaster.forecast(1, 2).fraction > 0.5);
    }

    #[test]
    fn test_reset_discards_session() {
        let mut forecaster = Forecaster::seeded(settings(1), 1);
        forecaster.setup(&games(1, 2, 3, 0));
        assert!(forecaster.is_ready());

        forecaster.reset();

        assert!(!forecaster.is_ready());
        assert_eq!(forecaster.forecast(1, 2), Fraction::UNKNOWN);
    }

    #[test]
    fn test_ranked_pairings_respect_threshold() {
        let mut matches = games(1, 2, 5, 0);
        matches.extend(games(2, 3, 5, 0));
        matches.extend(games(3, 4, 1, 0));
        let mut forecaster = Forecaster::seeded(settings(5), 1);
        forecaster.setup(&matches);

        let pairings = forecaster.ranked_pairings();

        assert_eq!(
            pairings,
            vec![
                PlayerPairing { first: 1, second: 2 },
                PlayerPairing { first: 1, second: 3 },
                PlayerPairing { first: 2, second: 3 },
            ]
        );
    }

    #[test]
    fn test_forecast_as_of_ignores_later_matches() {
        let mut matches = games(1, 2, 6, 0);
        matches.extend(games(2, 1, 30, 40));
        let mut forecaster = Forecaster::seeded(settings(1), 1);

        forecaster.forecast_as_of(&matches, start() + Duration::days(10));
        let early = forecaster.forecast(1, 2);
        let early_view = forecaster.granularity_forecast(1, 2, Granularity::Game).unwrap();

        forecaster.reset_and_rebuild(&matches);
        let late = forecaster.forecast(1, 2);

        assert!(early.fraction > 0.5);
        assert_eq!(early_view.lost_count, 0);
        assert!(late.fraction < 0.5);
    }

    #[test]
    fn test_synthesis_keeps_predictions_and_resets() {
        let mut matches = games(1, 2, 8, 0);
        matches.extend(games(2, 1, 2, 0));
        let mut forecaster = Forecaster::seeded(settings(1), 3);

        let synthetic = forecaster.synthesize_future_matches_at(&matches, start()).unwrap();

        assert_eq!(synthetic.len(), 20);
        assert_eq!(forecaster.predicted_matches(), synthetic.as_slice());
        assert!(!forecaster.is_ready());

        forecaster.setup(&matches);
        assert!(forecaster.predicted_matches().is_empty());
    }

    #[test]
    fn test_synthesis_with_zero_half_life_is_an_error() {
        let broken = ForecastSettings {
            half_life_days: 0.0,
            ..settings(1)
        };
        let mut forecaster = Forecaster::seeded(broken, 3);

        let result = forecaster.synthesize_future_matches_at(&games(1, 2, 10, 0), start());

        assert!(result.is_err());
        assert!(forecaster.predicted_matches().is_empty());
    }

    #[test]
    fn test_synthesis_with_unrepresentable_spacing_is_an_error() {
        let broken = ForecastSettings {
            synthetic_spacing_secs: i64::MAX,
            ..settings(1)
        };
        let mut forecaster = Forecaster::seeded(broken, 3);

        assert!(forecaster.synthesize_future_matches_at(&games(1, 2, 10, 0), start()).is_err());
        assert!(!forecaster.is_ready());
    }

    #[test]
    fn test_roster_setup_skips_outsiders() {
        let mut matches = games(1, 2, 4, 0);
        matches.extend(games(1, 7, 4, 0));
        let mut forecaster = Forecaster::seeded(settings(1), 1);

        forecaster.setup_with_roster(&matches, &[1, 2]);

        assert_eq!(forecaster.forecast(1, 7), Fraction::UNKNOWN);
        assert_eq!(
            forecaster
                .granularity_forecast(1, 2, Granularity::Game)
                .unwrap()
                .won_count,
            4
        );
    }
}
