//! Configuration loading, validation, and management for solaudit.
//!
//! Loads configuration from `~/.solaudit/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use solaudit_core::ModelSettings;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.solaudit/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Model name per capability tier
    #[serde(default)]
    pub models: ModelsConfig,

    /// Where the directory audit reads sources and writes its report
    #[serde(default)]
    pub audit: AuditConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("models", &self.models)
            .field("audit", &self.audit)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_small_model")]
    pub small: String,

    #[serde(default = "default_medium_model")]
    pub medium: String,

    #[serde(default = "default_large_model")]
    pub large: String,
}

fn default_small_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_medium_model() -> String {
    "openai/gpt-4o".into()
}
fn default_large_model() -> String {
    "anthropic/claude-sonnet-4".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            small: default_small_model(),
            medium: default_medium_model(),
            large: default_large_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory scanned for `.sol` files
    #[serde(default = "default_contracts_dir")]
    pub contracts_dir: PathBuf,

    /// Markdown metrics report destination (overwritten on every run)
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

fn default_contracts_dir() -> PathBuf {
    PathBuf::from("contracts").join("src")
}
fn default_report_path() -> PathBuf {
    PathBuf::from("contracts").join("metrics-report.md")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            contracts_dir: default_contracts_dir(),
            report_path: default_report_path(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.solaudit/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `SOLAUDIT_API_KEY` (highest priority)
    /// - `OPENROUTER_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("SOLAUDIT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("SOLAUDIT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Ok(model) = std::env::var("SOLAUDIT_MODEL_LARGE") {
            self.models.large = model;
        }

        if let Ok(dir) = std::env::var("SOLAUDIT_CONTRACTS_DIR") {
            self.audit.contracts_dir = PathBuf::from(dir);
        }

        if let Ok(report) = std::env::var("SOLAUDIT_REPORT_PATH") {
            self.audit.report_path = PathBuf::from(report);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".solaudit")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.default_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "default_max_tokens must be > 0".into(),
            ));
        }

        for (tier, model) in [
            ("small", &self.models.small),
            ("medium", &self.models.medium),
            ("large", &self.models.large),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "models.{tier} must not be empty"
                )));
            }
        }

        if self.audit.report_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "audit.report_path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model tiers and sampling defaults for the agent runtime.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            small: self.models.small.clone(),
            medium: self.models.medium.clone(),
            large: self.models.large.clone(),
            temperature: self.default_temperature,
            max_tokens: Some(self.default_max_tokens),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            models: ModelsConfig::default(),
            audit: AuditConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
