use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::info;

use super::models::{HistoricalMatch, Timestamp};
use crate::errors::{read_context, with_parse_context};

/// Load a JSON array of matches exported by the games projector
pub fn load_matches<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalMatch>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).with_context(|| read_context(path))?;
    let matches = parse_matches(&json)?;

    info!("Loaded {} matches from {}", matches.len(), path.display());
    Ok(matches)
}

pub fn parse_matches(json: &str) -> Result<Vec<HistoricalMatch>> {
    with_parse_context(serde_json::from_str(json), "match list")
}

pub fn parse_date_string(date_str: &str) -> Result<Timestamp> {
    // Try RFC3339 format (with timezone)
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try naive datetime format (without timezone), read as UTC
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc());
    }

    // Try a bare date, taken as end of day
    if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(23, 59, 59) {
            return Ok(dt.and_utc());
        }
    }

    anyhow::bail!("Failed to parse date: {}", date_str)
}
