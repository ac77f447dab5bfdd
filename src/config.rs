use std::path::Path;

use crate::ai::AgentConfig;
use crate::error::ConfigError;
use crate::game::WIN_LENGTH;
use crate::storage::StorageConfig;
use crate::training::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub training: TrainerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        if !(agent.learning_rate > 0.0 && agent.learning_rate <= 1.0) {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&agent.discount_factor) {
            return Err(ConfigError::Validation(
                "agent.discount_factor must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&agent.exploration_rate) {
            return Err(ConfigError::Validation(
                "agent.exploration_rate must be in [0, 1]".into(),
            ));
        }
        if !agent.progress_reward.is_finite() {
            return Err(ConfigError::Validation(
                "agent.progress_reward must be finite".into(),
            ));
        }

        let training = &self.training;
        if training.games_to_play == 0 {
            return Err(ConfigError::Validation(
                "training.games_to_play must be > 0".into(),
            ));
        }
        if training.board_size < WIN_LENGTH {
            return Err(ConfigError::Validation(format!(
                "training.board_size must be >= {WIN_LENGTH}"
            )));
        }
        if training.max_turns == 0 {
            return Err(ConfigError::Validation(
                "training.max_turns must be > 0".into(),
            ));
        }
        if training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        if training.eval_interval > 0 && training.eval_games == 0 {
            return Err(ConfigError::Validation(
                "training.eval_games must be > 0 when evaluation is enabled".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[agent]
learning_rate = 0.2
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.agent.learning_rate - 0.2).abs() < 1e-12);
        // Other fields should be defaults
        assert!((config.agent.discount_factor - 0.95).abs() < 1e-12);
        assert_eq!(config.training.games_to_play, 100);
        assert_eq!(config.training.board_size, 15);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert!((config.agent.exploration_rate - default.agent.exploration_rate).abs() < 1e-12);
        assert_eq!(config.training.max_turns, 225);
        assert_eq!(config.storage.table_dir, default.storage.table_dir);
        assert_eq!(config.training.seed, None);
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.training.games_to_play = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_learning_rate_out_of_range() {
        let mut config = AppConfig::default();
        config.agent.learning_rate = 0.0;
        assert!(config.validate().is_err());
        config.agent.learning_rate = 1.5;
        assert!(config.validate().is_err());
        config.agent.learning_rate = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_invalid_gamma() {
        let mut config = AppConfig::default();
        config.agent.discount_factor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_epsilon() {
        let mut config = AppConfig::default();
        config.agent.exploration_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_tiny_board() {
        let mut config = AppConfig::default();
        config.training.board_size = 4;
        assert!(config.validate().is_err());
        config.training.board_size = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.training.log_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_eval_without_games() {
        let mut config = AppConfig::default();
        config.training.eval_interval = 10;
        config.training.eval_games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.games_to_play, 100);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[training]
games_to_play = 500
seed = 11

[storage]
table_dir = "tables"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.training.games_to_play, 500);
        assert_eq!(config.training.seed, Some(11));
        assert_eq!(config.storage.table_dir, Path::new("tables"));
        // Others are defaults
        assert!((config.agent.learning_rate - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[agent]\nexploration_rate = 2.0\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
