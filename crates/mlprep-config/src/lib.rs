//! Configuration management.

mod settings;

pub use settings::{AppConfig, FeedSettings, GroupSettings, LoggingConfig, SamplingSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix for overrides, e.g. `MLPREP_SAMPLING__RATIO`.
pub const ENV_PREFIX: &str = "MLPREP";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlprep_core::types::{FeatureSelection, Fractal, ModelType};
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[model]
directory = "projects/kaggle"
features = ["age", "fare"]
model_type = "classification"
target = "survived"
seed = 7
shuffle = true

[sampling]
option = true
method = "over_smote"
ratio = 0.0
target_value = 1.0

[group]
name = "tech"
fractal = "5m"
members = ["AAPL", "MSFT"]
lookback_days = 20

[logging]
level = "debug"
"#;

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.model.target, "survived");
        assert_eq!(config.model.extension, "csv");
        assert_eq!(config.model.model_type, ModelType::Classification);
        assert_eq!(
            config.model.features,
            FeatureSelection::Named(vec!["age".to_string(), "fare".to_string()])
        );
        assert!(config.sampling.option);
        assert!(config.sampling.is_auto_ratio());
        assert_eq!(config.group.fractal, Fractal::Intraday { minutes: 5 });
        assert_eq!(config.group.group().members, vec!["AAPL", "MSFT"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.feeds.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_bad_fractal_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(&path, "[group]\nfractal = \"0m\"\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
