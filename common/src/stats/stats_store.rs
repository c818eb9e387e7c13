use std::path::PathBuf;

use super::PlayerStats;
use crate::config::{
    ConfigContentProvider, ConfigManager, FileContentConfigProvider, YamlConfigSerializer,
};
use crate::games::snake::GameEvent;
use crate::log;

/// Persists `PlayerStats` as YAML and hands the best score back to the game.
pub struct StatsStore<P: ConfigContentProvider = FileContentConfigProvider> {
    manager: ConfigManager<P, PlayerStats>,
}

impl StatsStore<FileContentConfigProvider> {
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path))
    }
}

impl<P: ConfigContentProvider> StatsStore<P> {
    pub fn new(provider: P) -> Self {
        Self {
            manager: ConfigManager::new(provider, YamlConfigSerializer::new()),
        }
    }

    pub fn load(&self) -> Result<PlayerStats, String> {
        self.manager.get_config()
    }

    pub fn best_score(&self) -> Result<u32, String> {
        Ok(self.load()?.high_score)
    }

    /// Returns true when the finished round set a new high score.
    pub fn record_game(&self, score: u32, level: u32) -> Result<bool, String> {
        let mut stats = self.load()?;
        let new_record = stats.record_game(score, level);
        self.manager.set_config(&stats)?;
        if new_record {
            log!("New high score: {}", score);
        }
        Ok(new_record)
    }

    /// Only `GameOver` is recorded; other events are ignored.
    pub fn record_event(&self, event: &GameEvent) -> Result<bool, String> {
        match *event {
            GameEvent::GameOver { score, level, .. } => self.record_game(score, level),
            GameEvent::Eat { .. }
            | GameEvent::LevelUp { .. }
            | GameEvent::Pause { .. }
            | GameEvent::Resume => Ok(false),
        }
    }
}
