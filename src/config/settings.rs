use std::path::Path;

use anyhow::{Context, Result, ensure};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::errors::{parse_context, read_context};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForecastSettings {
    pub half_life_days: f64,
    pub games_per_pairing: usize,
    pub min_games_for_ranked: usize,
    pub synthetic_spacing_secs: i64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            half_life_days: 60.0,
            games_per_pairing: 20,
            min_games_for_ranked: 10,
            synthetic_spacing_secs: 1,
        }
    }
}

impl ForecastSettings {
    /// Rejects values that would turn decay weights into NaN or push the
    /// synthetic timeline outside chrono's range.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.half_life_days.is_finite() && self.half_life_days > 0.0,
            "halfLifeDays must be a positive number, got {}",
            self.half_life_days
        );
        ensure!(self.games_per_pairing > 0, "gamesPerPairing must be at least 1");
        ensure!(
            TimeDelta::try_seconds(self.synthetic_spacing_secs).is_some(),
            "syntheticSpacingSecs {} is out of range",
            self.synthetic_spacing_secs
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub forecast: ForecastSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).with_context(|| read_context(path))?;
        let config: Self = serde_json::from_str(&json).with_context(|| parse_context("config"))?;

        config
            .forecast
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "forecast": { "gamesPerPairing": 8 } }"#).unwrap();

        assert_eq!(config.forecast.games_per_pairing, 8);
        assert_eq!(config.forecast.min_games_for_ranked, 10);
        assert_eq!(config.forecast.half_life_days, 60.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("league_forecast_no_such_config.json");
        let err = AppConfig::from_file(&missing).unwrap_err();

        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(ForecastSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_settings() {
        let zero_half_life = ForecastSettings {
            half_life_days: 0.0,
            ..ForecastSettings::default()
        };
        let nan_half_life = ForecastSettings {
            half_life_days: f64::NAN,
            ..ForecastSettings::default()
        };
        let no_games = ForecastSettings {
            games_per_pairing: 0,
            ..ForecastSettings::default()
        };
        let huge_spacing = ForecastSettings {
            synthetic_spacing_secs: i64::MAX,
            ..ForecastSettings::default()
        };

        for settings in [zero_half_life, nan_half_life, no_games, huge_spacing] {
            assert!(settings.validate().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn test_config_file_with_zero_half_life_is_rejected() {
        let path = std::env::temp_dir().join("league_forecast_zero_half_life.json");
        std::fs::write(&path, r#"{ "forecast": { "halfLifeDays": 0 } }"#).unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(format!("{err:#}").contains("halfLifeDays"));
    }
}
