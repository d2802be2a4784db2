use serde::{Deserialize, Serialize};

pub type CalibrationTable = [f64; 101];

/// The unit of evidence a win ratio is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Game,
    Set,
    Point,
}

impl Granularity {
    /// Combination priority: whole games are trusted first
    pub const ALL: [Granularity; 3] = [Granularity::Game, Granularity::Set, Granularity::Point];

    pub fn table(&self) -> &'static CalibrationTable {
        match self {
            Granularity::Game => &GAME_CALIBRATION,
            Granularity::Set => &SET_CALIBRATION,
            Granularity::Point => &POINT_CALIBRATION,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Granularity::Game => "game",
            Granularity::Set => "set",
            Granularity::Point => "point",
        }
    }
}

/// Maps a raw win ratio in [0, 1] through the granularity's table,
/// interpolating linearly between the two bracketing percentiles.
pub fn calibrate(granularity: Granularity, ratio: f64) -> f64 {
    let table = granularity.table();
    let index = ratio.clamp(0.0, 1.0) * 100.0;
    let lower = index.floor() as usize;
    let upper = (lower + 1).min(100);
    let t = index - lower as f64;

    if t == 0.0 {
        return table[lower];
    }

    table[lower] + (table[upper] - table[lower]) * t
}

/// Whole-game win ratio to win probability.
pub const GAME_CALIBRATION: CalibrationTable = [
    0.0247, 0.0247, 0.0426, 0.0584, 0.0729, 0.0866, 0.0996, 0.1121,
    0.1241, 0.1358, 0.1471, 0.1581, 0.1688, 0.1793, 0.1897, 0.1998,
    0.2097, 0.2195, 0.2292, 0.2387, 0.2481, 0.2573, 0.2665, 0.2755,
    0.2845, 0.2934, 0.3022, 0.3109, 0.3196, 0.3282, 0.3367, 0.3452,
    0.3537, 0.3620, 0.3704, 0.3787, 0.3869, 0.3951, 0.4033, 0.4115,
    0.4196, 0.4277, 0.4358, 0.4439, 0.4519, 0.4600, 0.4680, 0.4760,
    0.4840, 0.4920, 0.5000, 0.5080, 0.5160, 0.5240, 0.5320, 0.5400,
    0.5481, 0.5561, 0.5642, 0.5723, 0.5804, 0.5885, 0.5967, 0.6049,
    0.6131, 0.6213, 0.6296, 0.6380, 0.6463, 0.6548, 0.6633, 0.6718,
    0.6804, 0.6891, 0.6978, 0.7066, 0.7155, 0.7245, 0.7335, 0.7427,
    0.7519, 0.7613, 0.7708, 0.7805, 0.7903, 0.8002, 0.8103, 0.8207,
    0.8312, 0.8419, 0.8529, 0.8642, 0.8759, 0.8879, 0.9004, 0.9134,
    0.9271, 0.9416, 0.9574, 0.9753, 0.9753,
];

/// Set win ratio to match win probability.
pub const SET_CALIBRATION: CalibrationTable = [
    0.0157, 0.0157, 0.0292, 0.0419, 0.0542, 0.0660, 0.0775, 0.0888,
    0.0999, 0.1108, 0.1216, 0.1322, 0.1427, 0.1531, 0.1633, 0.1735,
    0.1836, 0.1936, 0.2035, 0.2133, 0.2231, 0.2328, 0.2425, 0.2521,
    0.2616, 0.2712, 0.2806, 0.2900, 0.2994, 0.3088, 0.3181, 0.3274,
    0.3366, 0.3458, 0.3550, 0.3642, 0.3734, 0.3825, 0.3916, 0.4007,
    0.4098, 0.4188, 0.4279, 0.4369, 0.4460, 0.4550, 0.4640, 0.4730,
    0.4820, 0.4910, 0.5000, 0.5090, 0.5180, 0.5270, 0.5360, 0.5450,
    0.5540, 0.5631, 0.5721, 0.5812, 0.5902, 0.5993, 0.6084, 0.6175,
    0.6266, 0.6358, 0.6450, 0.6542, 0.6634, 0.6726, 0.6819, 0.6912,
    0.7006, 0.7100, 0.7194, 0.7288, 0.7384, 0.7479, 0.7575, 0.7672,
    0.7769, 0.7867, 0.7965, 0.8064, 0.8164, 0.8265, 0.8367, 0.8469,
    0.8573, 0.8678, 0.8784, 0.8892, 0.9001, 0.9112, 0.9225, 0.9340,
    0.9458, 0.9581, 0.9708, 0.9843, 0.9843,
];

/// Point win ratio to match win probability. Small point edges compound
/// over a match, so this table is much steeper than the other two.
pub const POINT_CALIBRATION: CalibrationTable = [
    0.0012, 0.0012, 0.0012, 0.0012, 0.0012, 0.0012, 0.0012, 0.0012,
    0.0017, 0.0024, 0.0033, 0.0043, 0.0056, 0.0071, 0.0088, 0.0109,
    0.0132, 0.0159, 0.0190, 0.0225, 0.0265, 0.0309, 0.0359, 0.0414,
    0.0476, 0.0544, 0.0618, 0.0700, 0.0790, 0.0888, 0.0995, 0.1110,
    0.1235, 0.1369, 0.1513, 0.1667, 0.1830, 0.2004, 0.2188, 0.2381,
    0.2584, 0.2796, 0.3017, 0.3246, 0.3482, 0.3724, 0.3973, 0.4225,
    0.4482, 0.4740, 0.5000, 0.5260, 0.5518, 0.5775, 0.6027, 0.6276,
    0.6518, 0.6754, 0.6983, 0.7204, 0.7416, 0.7619, 0.7812, 0.7996,
    0.8170, 0.8333, 0.8487, 0.8631, 0.8765, 0.8890, 0.9005, 0.9112,
    0.9210, 0.9300, 0.9382, 0.9456, 0.9524, 0.9586, 0.9641, 0.9691,
    0.9735, 0.9775, 0.9810, 0.9841, 0.9868, 0.9891, 0.9912, 0.9929,
    0.9944, 0.9957, 0.9967, 0.9976, 0.9983, 0.9988, 0.9988, 0.9988,
    0.9988, 0.9988, 0.9988, 0.9988, 0.9988,
];
