use serde::{Deserialize, Serialize};

/// Probability that one player beats another, with a 0-1 reliability score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    pub fraction: f64,
    pub confidence: f64,
}

impl Fraction {
    /// No evidence at all
    pub const UNKNOWN: Fraction = Fraction {
        fraction: 0.0,
        confidence: 0.0,
    };

    pub fn new(fraction: f64, confidence: f64) -> Self {
        Self {
            fraction,
            confidence,
        }
    }

    /// The same estimate seen from the opponent's side
    pub fn inverse(&self) -> Self {
        Self {
            fraction: 1.0 - self.fraction,
            confidence: self.confidence,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.confidence == 0.0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

#[derive(Default)]
struct Accumulator {
    weighted_fraction: f64,
    weighted_confidence: f64,
    total_weight: f64,
}

impl Accumulator {
    fn add(&mut self, fraction: f64, weight: f64) {
        self.weighted_fraction += fraction * weight;
        self.weighted_confidence += weight * weight;
        self.total_weight += weight;
    }

    fn finish(self) -> Fraction {
        if self.total_weight <= 0.0 {
            return Fraction::UNKNOWN;
        }

        Fraction {
            fraction: self.weighted_fraction / self.total_weight,
            confidence: self.weighted_confidence / self.total_weight,
        }
    }
}

/// Confidence-weighted average of independent estimates. `None` entries are skipped.
pub fn weighted_combine<I>(estimates: I) -> Fraction
where
    I: IntoIterator<Item = Option<Fraction>>,
{
    let mut acc = Accumulator::default();

    for estimate in estimates.into_iter().flatten() {
        acc.add(estimate.fraction, estimate.confidence);
    }

    acc.finish()
}

/// Earlier estimates claim confidence budget first; later ones only fill
/// whatever space is left.
pub fn prioritized_combine<I>(estimates: I) -> Fraction
where
    I: IntoIterator<Item = Option<Fraction>>,
{
    let mut acc = Accumulator::default();
    let mut remaining_space = 1.0;

    for estimate in estimates.into_iter().flatten() {
        let weight = estimate.confidence * remaining_space;
        acc.add(estimate.fraction, weight);
        remaining_space -= weight;
    }

    acc.finish()
}

/// Chains "A beats I" with "I beats B" into an implied "A beats B"
pub fn link(first: Fraction, second: Fraction) -> Fraction {
    let for_a = first.fraction * second.fraction;
    let against_a = (1.0 - first.fraction) * (1.0 - second.fraction);
    let total = for_a + against_a;

    let fraction = if total > 0.0 { for_a / total } else { 0.5 };

    Fraction {
        fraction,
        confidence: first.confidence * second.confidence,
    }
}
