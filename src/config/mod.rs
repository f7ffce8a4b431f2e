// Configuration module

mod models;

pub use models::*;

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// The Gemini API key additionally falls back to the plain
    /// `GOOGLE_API_KEY` environment variable when no other source set it.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(
                File::with_name(&Self::default_config_path())
                    .required(false)
            )
            // Override with environment variables (prefix: GEMVISION_)
            .add_source(
                Environment::with_prefix("GEMVISION")
                    .separator("_")
            )
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if config.gemini.api_key.is_none() {
            config.gemini.api_key = std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }

        Ok(config)
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gemvision")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
