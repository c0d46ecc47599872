//! Configuration system for Teller
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/teller/config.{TELLER_ENV}.json
//! 3. Default values
//!
//! Where TELLER_ENV can be: production (default), development, test
//!
//! Environment variables override config file values:
//! - TELLER_PROJECT_ID
//! - TELLER_NLU_URL
//! - TELLER_LANGUAGE
//! - DIALOGFLOW_API_KEY (or whatever `api_key` names)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Connection settings for the hosted NLU provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider project the agent lives under
    pub project_id: String,

    /// Base URL of the detect-intent REST API
    #[serde(default = "default_provider_url")]
    pub url: String,

    /// API key or token (can be an environment variable name like
    /// "DIALOGFLOW_API_KEY")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default language for new sessions, a BCP-47 tag
    #[serde(default = "default_language")]
    pub language_code: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_url() -> String {
    "https://dialogflow.googleapis.com/v2".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_timeout() -> u64 {
    5
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            project_id: "banking-assistant".to_string(),
            url: default_provider_url(),
            api_key: None,
            language_code: default_language(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "project_id cannot be empty".to_string(),
            ));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "provider URL cannot be empty".to_string(),
            ));
        }

        if !is_valid_language_tag(&self.language_code) {
            return Err(ConfigError::ValidationError(format!(
                "'{}' is not a valid BCP-47 language tag",
                self.language_code
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve API key from environment variable if needed
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.as_ref().and_then(|key| {
            // If the key looks like an env var name, try to resolve it
            if key.chars().all(|c| c.is_uppercase() || c == '_') {
                std::env::var(key).ok()
            } else {
                Some(key.clone())
            }
        })
    }
}

/// Confidence thresholds for the three-tier routing policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    #[serde(default = "default_high_threshold")]
    pub high: f32,

    #[serde(default = "default_medium_threshold")]
    pub medium: f32,
}

fn default_high_threshold() -> f32 {
    0.8
}

fn default_medium_threshold() -> f32 {
    0.6
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

impl ConfidenceThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("high", self.high), ("medium", self.medium)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} threshold must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }

        if self.medium > self.high {
            return Err(ConfigError::ValidationError(format!(
                "medium threshold {} cannot exceed high threshold {}",
                self.medium, self.high
            )));
        }

        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// NLU provider connection
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Routing confidence thresholds
    #[serde(default)]
    pub confidence: ConfidenceThresholds,

    /// Seconds a session may sit idle before it expires
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Global kill-switch: when false, high-confidence intents still require
    /// confirmation
    #[serde(default)]
    pub auto_execute_high_confidence_intents: bool,

    /// Force confirmation for financial mutations regardless of confidence
    #[serde(default = "default_true")]
    pub require_confirmation_for_sensitive_operations: bool,

    /// Append every routed turn to the audit log
    #[serde(default = "default_true")]
    pub enable_intent_logging: bool,

    /// Mask account numbers, card numbers and recipients in the audit log
    #[serde(default = "default_true")]
    pub mask_sensitive_parameters: bool,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

fn default_session_timeout() -> u64 {
    1800
}

fn default_max_sessions() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            confidence: ConfidenceThresholds::default(),
            session_timeout_secs: default_session_timeout(),
            max_sessions: default_max_sessions(),
            auto_execute_high_confidence_intents: false,
            require_confirmation_for_sensitive_operations: true,
            enable_intent_logging: true,
            mask_sensitive_parameters: true,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/teller/config.{TELLER_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("TELLER_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir
                .join("teller")
                .join(format!("config.{}.json", env));

            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::info!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(project_id) = std::env::var("TELLER_PROJECT_ID") {
            self.provider.project_id = project_id;
        }

        if let Ok(url) = std::env::var("TELLER_NLU_URL") {
            self.provider.url = url;
        }

        if let Ok(language) = std::env::var("TELLER_LANGUAGE") {
            self.provider.language_code = language;
        }

        // API keys are resolved on-demand via resolve_api_key()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.provider.validate()?;
        self.confidence.validate()?;

        if self.session_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "session_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "max_sessions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("teller"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Loose structural check for a BCP-47 language tag ("en", "en-US", "es-419")
pub fn is_valid_language_tag(tag: &str) -> bool {
    if tag.is_empty() || tag.len() > 35 {
        return false;
    }

    tag.split('-').enumerate().all(|(i, subtag)| {
        let structural = !subtag.is_empty()
            && subtag.len() <= 8
            && subtag.chars().all(|c| c.is_ascii_alphanumeric());
        if i == 0 {
            structural && subtag.len() >= 2 && subtag.chars().all(|c| c.is_ascii_alphabetic())
        } else {
            structural
        }
    })
}
