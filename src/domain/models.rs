use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type Timestamp = DateTime<Utc>;

/// A recorded match outcome as delivered by the games projector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub played_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<MatchScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub sets_won: SetsWon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_points: Option<Vec<SetPoints>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetsWon {
    pub winner_sets: u32,
    pub loser_sets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPoints {
    pub winner_points: u32,
    pub loser_points: u32,
}

impl HistoricalMatch {
    pub fn new(winner: PlayerId, loser: PlayerId, played_at: Timestamp) -> Self {
        Self {
            id: None,
            winner,
            loser,
            played_at,
            score: None,
        }
    }

    pub fn with_sets(mut self, winner_sets: u32, loser_sets: u32) -> Self {
        let set_points = self.score.take().and_then(|s| s.set_points);
        self.score = Some(MatchScore {
            sets_won: SetsWon {
                winner_sets,
                loser_sets,
            },
            set_points,
        });
        self
    }

    /// Attaches per-set points. Set totals are derived from the points when no
    /// set score was given.
    pub fn with_set_points(mut self, points: Vec<SetPoints>) -> Self {
        let sets_won = match &self.score {
            Some(score) => score.sets_won,
            None => count_sets(&points),
        };
        self.score = Some(MatchScore {
            sets_won,
            set_points: Some(points),
        });
        self
    }

    /// Sets won and lost by the match winner, if a score was recorded
    pub fn set_totals(&self) -> Option<(u32, u32)> {
        self.score
            .as_ref()
            .map(|s| (s.sets_won.winner_sets, s.sets_won.loser_sets))
    }

    /// Points won and lost by the match winner across all sets
    pub fn point_totals(&self) -> Option<(u64, u64)> {
        let points = self.score.as_ref()?.set_points.as_ref()?;
        if points.is_empty() {
            return None;
        }

        Some(points.iter().fold((0u64, 0u64), |(won, lost), set| {
            (
                won.saturating_add(u64::from(set.winner_points)),
                lost.saturating_add(u64::from(set.loser_points)),
            )
        }))
    }
}

fn count_sets(points: &[SetPoints]) -> SetsWon {
    let winner_sets = points
        .iter()
        .filter(|p| p.winner_points > p.loser_points)
        .count() as u32;
    let loser_sets = points
        .iter()
        .filter(|p| p.loser_points > p.winner_points)
        .count() as u32;

    SetsWon {
        winner_sets,
        loser_sets,
    }
}

/// A generated future match. Never part of the real event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticMatch {
    pub id: String,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub played_at: Timestamp,
}

impl SyntheticMatch {
    /// Converts into an input game for leaderboard and simulation consumers
    pub fn to_historical(&self) -> HistoricalMatch {
        HistoricalMatch {
            id: Some(self.id.clone()),
            winner: self.winner,
            loser: self.loser,
            played_at: self.played_at,
            score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_point_totals_sum_all_sets() {
        let game = HistoricalMatch::new(1, 2, at_noon()).with_set_points(vec![
            SetPoints {
                winner_points: 11,
                loser_points: 7,
            },
            SetPoints {
                winner_points: 9,
                loser_points: 11,
            },
            SetPoints {
                winner_points: 11,
                loser_points: 4,
            },
        ]);

        assert_eq!(game.point_totals(), Some((31, 22)));
        assert_eq!(game.set_totals(), Some((2, 1)));
    }

    #[test]
    fn test_explicit_sets_survive_point_detail() {
        let game = HistoricalMatch::new(1, 2, at_noon())
            .with_sets(3, 2)
            .with_set_points(vec![SetPoints {
                winner_points: 11,
                loser_points: 9,
            }]);

        assert_eq!(game.set_totals(), Some((3, 2)));
    }

    #[test]
    fn test_empty_set_points_have_no_point_detail() {
        let game = HistoricalMatch::new(1, 2, at_noon()).with_set_points(Vec::new());

        assert_eq!(game.point_totals(), None);
    }

    #[test]
    fn test_parse_camel_case_match() {
        let json = r#"{
            "winner": 4,
            "loser": 9,
            "playedAt": "2024-05-02T18:30:00Z",
            "score": {
                "setsWon": { "winnerSets": 2, "loserSets": 0 },
                "setPoints": [
                    { "winnerPoints": 11, "loserPoints": 3 },
                    { "winnerPoints": 11, "loserPoints": 8 }
                ]
            }
        }"#;

        let game: HistoricalMatch = serde_json::from_str(json).unwrap();

        assert_eq!(game.winner, 4);
        assert_eq!(game.set_totals(), Some((2, 0)));
        assert_eq!(game.point_totals(), Some((22, 11)));
    }
}
