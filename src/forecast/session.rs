use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::calibration::Granularity;
use super::evidence::{GranularityForecast, granularity_forecast};
use super::fraction::{Fraction, prioritized_combine};
use super::graph::InteractionGraph;
use super::memo::MemoTable;
use super::propagation;
use crate::domain::Timestamp;

/// Every stage of one pair's forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairForecast {
    pub direct: Fraction,
    pub one_hop: Fraction,
    pub two_hop: Fraction,
    pub combined: Fraction,
}

/// Graph plus memo tables for one snapshot of the match history.
///
/// Direct fractions for every played pair are computed up front; one-hop and
/// two-hop estimates read only from that finished table, either in explicit
/// passes or on demand.
pub struct ForecastSession {
    graph: InteractionGraph,
    half_life_days: f64,
    as_of: Option<Timestamp>,
    direct: MemoTable,
    one_hop: MemoTable,
    two_hop: MemoTable,
}

impl ForecastSession {
    pub fn new(graph: InteractionGraph, half_life_days: f64, as_of: Option<Timestamp>) -> Self {
        let n_players = graph.len();
        let mut session = Self {
            graph,
            half_life_days,
            as_of,
            direct: MemoTable::new(n_players),
            one_hop: MemoTable::new(n_players),
            two_hop: MemoTable::new(n_players),
        };

        session.run_direct_pass();
        session
    }

    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    pub fn as_of(&self) -> Option<Timestamp> {
        self.as_of
    }

    fn run_direct_pass(&mut self) {
        let pairs: Vec<(usize, usize)> = self.graph.played_pairs().collect();

        for &(a, b) in &pairs {
            let value = self.compute_direct(a, b);
            self.direct.insert(a, b, value);
        }

        debug!("Direct pass: {} pairs", pairs.len());
    }

    /// One-hop for every pair, then two-hop for every pair
    pub fn run_multi_hop_passes(&mut self, pairs: &[(usize, usize)]) {
        for &(a, b) in pairs {
            self.one_hop(a, b);
        }
        debug!("One-hop pass: {} pairs", pairs.len());

        for &(a, b) in pairs {
            self.two_hop(a, b);
        }
        debug!("Two-hop pass: {} pairs", pairs.len());

        info!(
            "Forecast {} pairs ({} direct, {} one-hop, {} two-hop cached)",
            pairs.len(),
            self.direct.filled(),
            self.one_hop.filled(),
            self.two_hop.filled()
        );
    }

    fn reference_time(&self, a: usize, b: usize) -> Option<Timestamp> {
        self.as_of.or_else(|| self.graph.latest_match_time(a, b))
    }

    pub fn granularity(&self, a: usize, b: usize, granularity: Granularity) -> Option<GranularityForecast> {
        let view = self.graph.pair_view(a, b)?;
        let reference = self.reference_time(a, b)?;
        granularity_forecast(view, granularity, reference, self.half_life_days)
    }

    fn compute_direct(&self, a: usize, b: usize) -> Fraction {
        prioritized_combine(
            Granularity::ALL.map(|g| self.granularity(a, b, g).map(|f| f.as_fraction())),
        )
    }

    pub fn direct(&self, a: usize, b: usize) -> Fraction {
        self.direct.get(a, b).unwrap_or(Fraction::UNKNOWN)
    }

    pub fn one_hop(&mut self, a: usize, b: usize) -> Fraction {
        if let Some(cached) = self.one_hop.get(a, b) {
            return cached;
        }

        let (low, high) = (a.min(b), a.max(b));
        let value = propagation::one_hop(&self.graph, &self.direct, low, high);
        self.one_hop.insert(low, high, value);
        self.one_hop.get(a, b).unwrap_or(Fraction::UNKNOWN)
    }

    pub fn two_hop(&mut self, a: usize, b: usize) -> Fraction {
        if let Some(cached) = self.two_hop.get(a, b) {
            return cached;
        }

        let (low, high) = (a.min(b), a.max(b));
        let value = propagation::two_hop(&self.graph, &self.direct, low, high);
        self.two_hop.insert(low, high, value);
        self.two_hop.get(a, b).unwrap_or(Fraction::UNKNOWN)
    }

    pub fn breakdown(&mut self, a: usize, b: usize) -> PairForecast {
        if a == b {
            return PairForecast {
                direct: Fraction::UNKNOWN,
                one_hop: Fraction::UNKNOWN,
                two_hop: Fraction::UNKNOWN,
                combined: Fraction::UNKNOWN,
            };
        }

        let direct = self.direct(a, b);
        let one_hop = self.one_hop(a, b);
        let two_hop = self.two_hop(a, b);

        PairForecast {
            direct,
            one_hop,
            two_hop,
            combined: prioritized_combine([Some(direct), Some(one_hop), Some(two_hop)]),
        }
    }

    pub fn forecast(&mut self, a: usize, b: usize) -> Fraction {
        self.breakdown(a, b).combined
    }
}
