//! Inference configuration system.
//!
//! Configuration can be loaded from:
//! - TOML files (default: ~/.config/inkling/inference.toml)
//! - Environment variables (OPENAI_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use inkling_inference::config::InferenceConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = InferenceConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = InferenceConfig::from_file(std::path::Path::new("inference.toml")).expect("Failed to load");
//!
//! // Or from environment variables
//! let config = InferenceConfig::from_env();
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::openai::OpenAIConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main inference configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// OpenAI-compatible backend settings.
    #[serde(default)]
    pub openai: OpenAIConfig,
}

impl InferenceConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/inkling/inference.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("inkling");
        path.push("inference.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    ///
    /// This tries to load from ~/.config/inkling/inference.toml first.
    /// If that file doesn't exist, it falls back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading inference config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            Ok(Self::from_env())
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content with `${VAR}` substitution.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);

        #[derive(Deserialize)]
        struct TomlRoot {
            inference: InferenceConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        root.inference.validate()?;
        Ok(root.inference)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            openai: OpenAIConfig::from_env(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let openai = &self.openai;

        if openai.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        // Basic URL validation
        if !openai.base_url.starts_with("http://") && !openai.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                openai.base_url
            )));
        }

        for (name, model) in [
            ("embed_model", &openai.embed_model),
            ("gen_model", &openai.gen_model),
            ("vision_model", &openai.vision_model),
            ("image_model", &openai.image_model),
        ] {
            if model.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }

        if openai.embed_dimension == 0 {
            return Err(ConfigError::Validation(
                "embed_dimension must be greater than zero".to_string(),
            ));
        }

        for (name, secs) in [
            ("embed_timeout_secs", openai.embed_timeout_secs),
            ("generate_timeout_secs", openai.generate_timeout_secs),
            ("image_timeout_secs", openai.image_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}
