use serde::{Deserialize, Serialize};

use super::calibration::{Granularity, calibrate};
use super::fraction::Fraction;
use super::graph::PairView;
use super::weighting::calculate_weight;
use crate::domain::{HistoricalMatch, Timestamp};

/// Confidence gained per unit of evidence and per won*lost product, in
/// percentage points. One game says far more than one point.
const GAME_CONFIDENCE: (f64, f64) = (5.0, 1.0);
const SET_CONFIDENCE: (f64, f64) = (3.2, 0.4);
const POINT_CONFIDENCE: (f64, f64) = (0.7, 0.0);

/// Uncombined estimate at one granularity, with the raw unit counts for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GranularityForecast {
    pub fraction: f64,
    pub confidence: f64,
    pub won_count: u64,
    pub lost_count: u64,
}

impl GranularityForecast {
    pub fn as_fraction(&self) -> Fraction {
        Fraction::new(self.fraction, self.confidence)
    }
}

#[derive(Debug, Default)]
struct Tally {
    weighted_won: f64,
    weighted_lost: f64,
    won: u64,
    lost: u64,
}

impl Tally {
    fn add(&mut self, won: u64, lost: u64, weight: f64) {
        self.won = self.won.saturating_add(won);
        self.lost = self.lost.saturating_add(lost);
        self.weighted_won += won as f64 * weight;
        self.weighted_lost += lost as f64 * weight;
    }

    fn weighted_total(&self) -> f64 {
        self.weighted_won + self.weighted_lost
    }
}

/// Calibrated win fraction of the view's owner at one granularity, or `None`
/// when the pair has no evidence of that kind.
///
/// Decay only shapes the ratio. Confidence counts every unit in full, so
/// more evidence never lowers it.
pub fn granularity_forecast(
    view: PairView<'_>,
    granularity: Granularity,
    reference: Timestamp,
    half_life_days: f64,
) -> Option<GranularityForecast> {
    let tally = tally_evidence(view, granularity, reference, half_life_days);

    if (tally.won == 0 && tally.lost == 0) || tally.weighted_total() <= 0.0 {
        return None;
    }

    let ratio = tally.weighted_won / tally.weighted_total();

    Some(GranularityForecast {
        fraction: calibrate(granularity, ratio),
        confidence: confidence(granularity, tally.won as f64, tally.lost as f64),
        won_count: tally.won,
        lost_count: tally.lost,
    })
}

fn tally_evidence(
    view: PairView<'_>,
    granularity: Granularity,
    reference: Timestamp,
    half_life_days: f64,
) -> Tally {
    let mut tally = Tally::default();

    for game in view.won() {
        if let Some((won, lost)) = units(game, granularity) {
            tally.add(won, lost, calculate_weight(game.played_at, reference, half_life_days));
        }
    }

    for game in view.lost() {
        if let Some((won, lost)) = units(game, granularity) {
            tally.add(lost, won, calculate_weight(game.played_at, reference, half_life_days));
        }
    }

    tally
}

/// Evidence units (winner's, loser's) a match contributes at a granularity
fn units(game: &HistoricalMatch, granularity: Granularity) -> Option<(u64, u64)> {
    match granularity {
        Granularity::Game => Some((1, 0)),
        Granularity::Set => game
            .set_totals()
            .map(|(won, lost)| (u64::from(won), u64::from(lost))),
        Granularity::Point => game.point_totals(),
    }
}

pub fn confidence(granularity: Granularity, wins: f64, losses: f64) -> f64 {
    let (addition, product) = match granularity {
        Granularity::Game => GAME_CONFIDENCE,
        Granularity::Set => SET_CONFIDENCE,
        Granularity::Point => POINT_CONFIDENCE,
    };

    let points = addition * (wins + losses) + product * (wins * losses);
    (points / 100.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SetPoints;
    use crate::forecast::graph::InteractionGraph;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};

    const HALF_LIFE: f64 = 60.0;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn record(wins: usize, losses: usize) -> Vec<HistoricalMatch> {
        let mut matches = vec![HistoricalMatch::new(1, 2, now()); wins];
        matches.extend(vec![HistoricalMatch::new(2, 1, now()); losses]);
        matches
    }

    fn forecast(matches: &[HistoricalMatch], granularity: Granularity) -> Option<GranularityForecast> {
        let graph = InteractionGraph::build(matches);
        let view = graph.pair_view(0, 1)?;
        granularity_forecast(view, granularity, now(), HALF_LIFE)
    }

    #[test]
    fn test_game_evidence() {
        let result = forecast(&record(8, 2), Granularity::Game).unwrap();

        assert_eq!(result.won_count, 8);
        assert_eq!(result.lost_count, 2);
        assert_eq!(result.fraction, Granularity::Game.table()[80]);
        assert_abs_diff_eq!(result.confidence, 0.66, epsilon = 1e-12);
    }

    #[test]
    fn test_even_record_maps_to_midpoint() {
        let result = forecast(&record(3, 3), Granularity::Game).unwrap();

        assert_eq!(result.fraction, 0.5);
    }

    #[test]
    fn test_missing_detail_is_absent() {
        let matches = record(4, 1);

        assert!(forecast(&matches, Granularity::Game).is_some());
        assert!(forecast(&matches, Granularity::Set).is_none());
        assert!(forecast(&matches, Granularity::Point).is_none());
    }

    #[test]
    fn test_set_and_point_units_follow_orientation() {
        let matches = vec![
            HistoricalMatch::new(1, 2, now()).with_set_points(vec![
                SetPoints {
                    winner_points: 11,
                    loser_points: 5,
                },
                SetPoints {
                    winner_points: 11,
                    loser_points: 9,
                },
            ]),
            HistoricalMatch::new(2, 1, now()).with_sets(2, 1),
        ];

        let sets = forecast(&matches, Granularity::Set).unwrap();
        assert_eq!((sets.won_count, sets.lost_count), (3, 2));

        let points = forecast(&matches, Granularity::Point).unwrap();
        assert_eq!((points.won_count, points.lost_count), (22, 14));
        assert_abs_diff_eq!(points.confidence, 0.7 * 36.0 / 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_older_results_count_less() {
        let mut matches = record(5, 0);
        matches.extend(vec![HistoricalMatch::new(2, 1, now() - Duration::days(120)); 5]);

        let result = forecast(&matches, Granularity::Game).unwrap();

        // 5 fresh wins against 5 losses at quarter weight
        assert_abs_diff_eq!(result.fraction, calibrate(Granularity::Game, 0.8), epsilon = 1e-9);
        assert_eq!(result.lost_count, 5);
        // 5 * 10 + 1 * 25 percentage points, undecayed
        assert_abs_diff_eq!(result.confidence, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_stale_evidence_keeps_full_confidence() {
        let fresh = forecast(&record(10, 0), Granularity::Game).unwrap();
        let stale_matches = vec![HistoricalMatch::new(1, 2, now() - Duration::days(600)); 10];
        let stale = forecast(&stale_matches, Granularity::Game).unwrap();

        assert_eq!(stale.confidence, fresh.confidence);
        assert_eq!(stale.fraction, fresh.fraction);
    }

    #[test]
    fn test_huge_point_scores_do_not_overflow() {
        let big = SetPoints {
            winner_points: u32::MAX,
            loser_points: u32::MAX - 1,
        };
        let matches = vec![
            HistoricalMatch::new(1, 2, now()).with_set_points(vec![big, big]),
            HistoricalMatch::new(1, 2, now()).with_set_points(vec![big]),
        ];

        let points = forecast(&matches, Granularity::Point).unwrap();

        assert_eq!(points.won_count, 3 * u64::from(u32::MAX));
        assert_eq!(points.lost_count, 3 * u64::from(u32::MAX - 1));
        assert_eq!(points.confidence, 1.0);
    }

    #[test]
    fn test_confidence_grows_with_sample_and_caps() {
        let mut previous = 0.0;
        for wins in 1..40 {
            let current = confidence(Granularity::Game, wins as f64, 1.0);
            assert!(current >= previous);
            assert!(current <= 1.0);
            previous = current;
        }
        assert_eq!(previous, 1.0);

        for granularity in Granularity::ALL {
            assert!(confidence(granularity, 10.0, 2.0) <= confidence(granularity, 12.0, 2.0));
        }
    }
}
