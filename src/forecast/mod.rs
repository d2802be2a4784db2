pub mod calibration;
pub mod evidence;
pub mod forecaster;
pub mod fraction;
pub mod graph;
mod memo;
mod propagation;
pub mod session;
pub mod synthesis;
mod weighting;

pub use calibration::{Granularity, calibrate};
pub use evidence::GranularityForecast;
pub use forecaster::Forecaster;
pub use fraction::{Fraction, link, prioritized_combine, weighted_combine};
pub use graph::InteractionGraph;
pub use session::{ForecastSession, PairForecast};
pub use synthesis::{MatchIdSource, PairingForecast, PlayerPairing, SequentialIds};
pub use weighting::calculate_weight;
