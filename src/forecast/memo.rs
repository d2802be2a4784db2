use ndarray::Array2;

use super::fraction::Fraction;

/// Write-once pairwise cache. Only the (low, high) orientation is stored; the
/// reverse is derived on lookup so both sides always agree.
#[derive(Debug, Clone)]
pub struct MemoTable {
    entries: Array2<Option<Fraction>>,
}

impl MemoTable {
    pub fn new(n_players: usize) -> Self {
        Self {
            entries: Array2::from_elem((n_players, n_players), None),
        }
    }

    pub fn get(&self, a: usize, b: usize) -> Option<Fraction> {
        if a < b {
            self.entries[[a, b]]
        } else if a > b {
            self.entries[[b, a]].map(|f| f.inverse())
        } else {
            None
        }
    }

    /// Stores `value` as seen from `a`. An existing entry is kept and returned.
    pub fn insert(&mut self, a: usize, b: usize, value: Fraction) -> Fraction {
        if a == b {
            return Fraction::UNKNOWN;
        }

        let (low, high, stored) = if a < b {
            (a, b, value)
        } else {
            (b, a, value.inverse())
        };
        let entry = *self.entries[[low, high]].get_or_insert(stored);

        if a < b { entry } else { entry.inverse() }
    }

    pub fn filled(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}
