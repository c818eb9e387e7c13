use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::snake::{BotType, SnakeSettings};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "neon_snake_config.yaml";

pub fn get_config_manager(
    file_path: &str,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub game: SnakeSettings,
    pub runner: RunnerConfig,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.runner.validate()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    pub games: u32,
    pub autopilot: BotType,
    pub realtime: bool,
    pub stats_file: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            games: 5,
            autopilot: BotType::Efficient,
            realtime: false,
            stats_file: "neon_snake_stats.yaml".to_string(),
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.games == 0 {
            return Err("games must be greater than 0".to_string());
        }
        if self.games > 10_000 {
            return Err("games must not exceed 10000".to_string());
        }
        if self.stats_file.trim().is_empty() {
            return Err("stats_file must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigSerializer};
    use common::games::snake::WallMode;

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_neon_snake_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_config_can_be_saved_and_loaded_with_manager() {
        let config = Config {
            game: SnakeSettings {
                wall_mode: WallMode::Solid,
                direction_queue_size: 2,
                ..SnakeSettings::default()
            },
            runner: RunnerConfig {
                games: 3,
                autopilot: BotType::Random,
                ..RunnerConfig::default()
            },
        };
        let file_path = get_temp_file_path();
        let manager = get_config_manager(&file_path);

        manager.set_config(&config).unwrap();
        assert_eq!(manager.get_config().unwrap(), config);

        let reloaded = get_config_manager(&file_path);
        assert_eq!(reloaded.get_config().unwrap(), config);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager("this_file_does_not_exist.yaml");
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            game:
              field_width: 3
              wall_mode: kill
            runner:
              games: 2
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider
            .set_config_content(invalid_config_content)
            .unwrap();

        let manager = get_config_manager(&file_path);
        assert!(manager.get_config().is_err());

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let serializer = YamlConfigSerializer::new();
        let config: Config = serializer
            .deserialize("runner:\n  autopilot: random\n")
            .unwrap();
        assert_eq!(config.runner.autopilot, BotType::Random);
        assert_eq!(config.runner.games, 5);
        assert_eq!(config.game, SnakeSettings::default());
    }
}
