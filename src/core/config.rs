//! # Configuration
//!
//! Environment-driven settings for the adherence engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::features::prediction::{ModelConfig, WeightVector};
use anyhow::Result;
use log::info;
use std::env;

pub const DEFAULT_DATABASE_PATH: &str = "medminder.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding per-user adherence history
    pub database_path: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Optional YAML file overriding the built-in model weights
    pub model_config_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            model_config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        if database_path.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_PATH must not be empty"));
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let model_config_path = env::var("MODEL_CONFIG_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Ok(Config {
            database_path,
            log_level,
            model_config_path,
        })
    }

    /// Resolve the process-wide model weights.
    ///
    /// Fails at startup if the configured model does not match the encoder's
    /// feature count, so a mismatch never reaches `predict`.
    pub fn weights(&self) -> Result<WeightVector> {
        match &self.model_config_path {
            Some(path) => {
                let model = ModelConfig::load(path)?;
                info!("Loaded miss-prediction model '{}' from {}", model.name, path);
                Ok(model.into_weights()?)
            }
            None => Ok(WeightVector::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::prediction::{DEFAULT_BIAS, DEFAULT_COEFFICIENTS};
    use std::io::Write;

    #[test]
    fn test_default_config_uses_builtin_weights() {
        let config = Config::default();
        let weights = config.weights().unwrap();
        assert_eq!(weights.coefficients(), &DEFAULT_COEFFICIENTS);
        assert_eq!(weights.bias(), DEFAULT_BIAS);
    }

    #[test]
    fn test_weights_from_model_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name: retrained\ncoefficients: [1.0, 0.1, -0.5, 0.25]\nbias: -3.0"
        )
        .unwrap();

        let config = Config {
            model_config_path: Some(file.path().to_string_lossy().to_string()),
            ..Config::default()
        };
        let weights = config.weights().unwrap();
        assert_eq!(weights.coefficients(), &[1.0, 0.1, -0.5, 0.25]);
        assert_eq!(weights.bias(), -3.0);
    }

    #[test]
    fn test_mismatched_model_file_fails_at_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: broken\ncoefficients: [1.0, 0.1]\nbias: 0.0").unwrap();

        let config = Config {
            model_config_path: Some(file.path().to_string_lossy().to_string()),
            ..Config::default()
        };
        assert!(config.weights().is_err());
    }
}
