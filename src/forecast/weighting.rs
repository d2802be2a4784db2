use crate::domain::Timestamp;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn calculate_weight(played_at: Timestamp, reference: Timestamp, half_life_days: f64) -> f64 {
    let age_days = calculate_age_days(played_at, reference);
    apply_exponential_decay(age_days, half_life_days)
}

fn calculate_age_days(played_at: Timestamp, reference: Timestamp) -> f64 {
    let duration = reference.signed_duration_since(played_at);
    (duration.num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0)
}

fn apply_exponential_decay(age_days: f64, half_life_days: f64) -> f64 {
    // weight = 2^(-days_ago / half_life)
    (-age_days / half_life_days).exp2()
}
