use std::collections::HashMap;

use log::{debug, info};
use ndarray::Array2;

use crate::domain::{HistoricalMatch, PlayerId, Timestamp};

#[derive(Debug, Clone)]
pub struct PlayerNode {
    pub id: PlayerId,
    pub total_games: usize,
    pub last_match_time: Option<Timestamp>,
    /// Indices of everyone this player has met, ascending
    pub opponents: Vec<usize>,
}

/// Matches between two players, seen from the lower-indexed player
#[derive(Debug, Clone, Default)]
struct PairRecord {
    won: Vec<usize>,
    lost: Vec<usize>,
}

/// Ordered view of a pair record: `won` are the owner's wins over the opponent
#[derive(Debug, Clone, Copy)]
pub struct PairView<'a> {
    matches: &'a [HistoricalMatch],
    won: &'a [usize],
    lost: &'a [usize],
}

impl<'a> PairView<'a> {
    pub fn won(self) -> impl Iterator<Item = &'a HistoricalMatch> + 'a {
        let matches = self.matches;
        self.won.iter().map(move |&i| &matches[i])
    }

    pub fn lost(self) -> impl Iterator<Item = &'a HistoricalMatch> + 'a {
        let matches = self.matches;
        self.lost.iter().map(move |&i| &matches[i])
    }

    pub fn games_won(&self) -> usize {
        self.won.len()
    }

    pub fn games_lost(&self) -> usize {
        self.lost.len()
    }
}

/// Opponent graph for one forecasting session. Players are addressed by dense
/// index (ascending player id); pairs by a dense index matrix.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    matches: Vec<HistoricalMatch>,
    players: Vec<PlayerNode>,
    player_to_idx: HashMap<PlayerId, usize>,
    pair_lookup: Array2<Option<usize>>,
    records: Vec<PairRecord>,
}

impl InteractionGraph {
    pub fn build(matches: &[HistoricalMatch]) -> Self {
        Self::build_with_roster(matches, None)
    }

    /// With a roster, matches naming anyone outside it are skipped.
    pub fn build_with_roster(matches: &[HistoricalMatch], roster: Option<&[PlayerId]>) -> Self {
        let accepted = accept_matches(matches, roster);

        // 1. Enumerate players and pairs
        let player_ids = extract_player_ids(&accepted, roster);
        let player_to_idx: HashMap<PlayerId, usize> = player_ids
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        let pairs = extract_pairs(&accepted, &player_to_idx);

        let n_players = player_ids.len();
        // Note: dense on purpose; a ladder has at most a few hundred players.
        let mut pair_lookup = Array2::<Option<usize>>::from_elem((n_players, n_players), None);
        for (record_idx, &(low, high)) in pairs.iter().enumerate() {
            pair_lookup[[low, high]] = Some(record_idx);
            pair_lookup[[high, low]] = Some(record_idx);
        }

        // 2. Fill records and player nodes
        let mut records = vec![PairRecord::default(); pairs.len()];
        let mut players: Vec<PlayerNode> = player_ids
            .iter()
            .map(|&id| PlayerNode {
                id,
                total_games: 0,
                last_match_time: None,
                opponents: Vec::new(),
            })
            .collect();

        for (match_idx, game) in accepted.iter().enumerate() {
            let winner = player_to_idx[&game.winner];
            let loser = player_to_idx[&game.loser];
            let Some(record_idx) = pair_lookup[[winner, loser]] else {
                continue;
            };
            let record = &mut records[record_idx];

            if winner < loser {
                record.won.push(match_idx);
            } else {
                record.lost.push(match_idx);
            }

            for idx in [winner, loser] {
                let node = &mut players[idx];
                node.total_games += 1;
                node.last_match_time = node.last_match_time.max(Some(game.played_at));
            }
        }

        for &(low, high) in &pairs {
            players[low].opponents.push(high);
            players[high].opponents.push(low);
        }
        for node in players.iter_mut() {
            node.opponents.sort_unstable();
        }

        info!(
            "Built interaction graph: {} players, {} pairings, {} matches",
            n_players,
            pairs.len(),
            accepted.len()
        );

        Self {
            matches: accepted,
            players,
            player_to_idx,
            pair_lookup,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.player_to_idx.get(&player).copied()
    }

    pub fn player(&self, idx: usize) -> &PlayerNode {
        &self.players[idx]
    }

    pub fn players(&self) -> &[PlayerNode] {
        &self.players
    }

    pub fn opponents(&self, idx: usize) -> &[usize] {
        &self.players[idx].opponents
    }

    pub fn has_played(&self, a: usize, b: usize) -> bool {
        self.pair_lookup[[a, b]].is_some()
    }

    /// The record between `owner` and `opponent`, oriented towards `owner`
    pub fn pair_view(&self, owner: usize, opponent: usize) -> Option<PairView<'_>> {
        let record = &self.records[self.pair_lookup[[owner, opponent]]?];
        let (won, lost) = if owner < opponent {
            (&record.won, &record.lost)
        } else {
            (&record.lost, &record.won)
        };

        Some(PairView {
            matches: &self.matches,
            won,
            lost,
        })
    }

    /// Every pair that has played, as (lower index, higher index)
    pub fn played_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.players.iter().enumerate().flat_map(|(low, node)| {
            node.opponents
                .iter()
                .filter(move |&&high| high > low)
                .map(move |&high| (low, high))
        })
    }

    /// Later of the two players' last match times
    pub fn latest_match_time(&self, a: usize, b: usize) -> Option<Timestamp> {
        self.players[a]
            .last_match_time
            .max(self.players[b].last_match_time)
    }

    pub fn ranked_players(&self, min_games: usize) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&idx| self.players[idx].total_games >= min_games)
            .collect()
    }
}

fn accept_matches(matches: &[HistoricalMatch], roster: Option<&[PlayerId]>) -> Vec<HistoricalMatch> {
    let mut skipped = 0;
    let accepted: Vec<HistoricalMatch> = matches
        .iter()
        .filter(|game| {
            let known = roster.is_none_or(|r| r.contains(&game.winner) && r.contains(&game.loser));
            let keep = known && game.winner != game.loser;
            if !keep {
                skipped += 1;
            }
            keep
        })
        .cloned()
        .collect();

    if skipped > 0 {
        debug!("Skipped {} matches with unknown or identical players", skipped);
    }

    accepted
}

fn extract_player_ids(matches: &[HistoricalMatch], roster: Option<&[PlayerId]>) -> Vec<PlayerId> {
    let mut ids: Vec<PlayerId> = match roster {
        Some(r) => r.to_vec(),
        None => matches.iter().flat_map(|g| [g.winner, g.loser]).collect(),
    };

    ids.sort_unstable();
    ids.dedup();
    ids
}

fn extract_pairs(
    matches: &[HistoricalMatch],
    player_to_idx: &HashMap<PlayerId, usize>,
) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = matches
        .iter()
        .map(|g| {
            let a = player_to_idx[&g.winner];
            let b = player_to_idx[&g.loser];
            (a.min(b), a.max(b))
        })
        .collect();

    pairs.sort_unstable();
    pairs.dedup();
    pairs
}
