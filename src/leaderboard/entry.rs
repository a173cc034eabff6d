use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StoreResult};

// One retained score. Field names match the backing document and the HTTP
// payloads, so the same type is used for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "playerName")]
    pub player: String,
    #[serde(rename = "level")]
    pub category: i64,
    /// Informational only, never used for ranking.
    #[serde(rename = "score")]
    pub points: i64,
    /// Completion time in seconds. Lower is better.
    #[serde(rename = "time")]
    pub duration: f64,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_entries: usize,
    pub unique_players: usize,
}

impl Entry {
    /// Builds an entry stamped with the current time, after checking the
    /// caller-supplied fields.
    pub fn submitted(player: &str, category: i64, points: i64, duration: f64) -> StoreResult<Self> {
        validate(player, duration)?;
        Ok(Entry {
            player: player.to_string(),
            category,
            points,
            duration,
            recorded_at: Utc::now(),
        })
    }
}

fn validate(player: &str, duration: f64) -> StoreResult<()> {
    if player.is_empty() {
        return Err(StorageError::InvalidInput(
            "player name cannot be empty".to_string(),
        ));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(StorageError::InvalidInput(format!(
            "time must be a finite, non-negative number of seconds (got {duration})"
        )));
    }
    Ok(())
}
