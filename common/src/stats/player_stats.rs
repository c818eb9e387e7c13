use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Validate;

/// Lifetime numbers for one player. Only finished rounds are recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub high_score: u32,
    pub total_games: u32,
    pub total_score: u64,
    /// Level reached in the most recent round.
    pub level: u32,
    /// RFC 3339 timestamp of the most recent round.
    pub last_played: Option<String>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            high_score: 0,
            total_games: 0,
            total_score: 0,
            level: 1,
            last_played: None,
        }
    }
}

impl PlayerStats {
    /// Returns true when `score` beats the previous high score.
    pub fn record_game(&mut self, score: u32, level: u32) -> bool {
        self.record_game_at(score, level, Utc::now())
    }

    pub fn record_game_at(&mut self, score: u32, level: u32, played_at: DateTime<Utc>) -> bool {
        self.total_games = self.total_games.saturating_add(1);
        self.total_score = self.total_score.saturating_add(u64::from(score));
        self.level = level.max(1);
        self.last_played = Some(played_at.to_rfc3339());

        if score > self.high_score {
            self.high_score = score;
            return true;
        }
        false
    }

    pub fn average_score(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_score as f64 / f64::from(self.total_games)
    }

    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_played.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Validate for PlayerStats {
    fn validate(&self) -> Result<(), String> {
        if self.level == 0 {
            return Err("level must be at least 1".to_string());
        }
        if self.total_games == 0 && (self.total_score > 0 || self.high_score > 0) {
            return Err("scores recorded without any games".to_string());
        }
        if u64::from(self.high_score) > self.total_score {
            return Err("high_score exceeds total_score".to_string());
        }
        if let Some(raw) = self.last_played.as_deref()
            && DateTime::parse_from_rfc3339(raw).is_err()
        {
            return Err(format!("last_played is not an RFC 3339 timestamp: {}", raw));
        }
        Ok(())
    }
}
