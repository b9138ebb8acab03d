//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP transport
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider
    #[serde(default)]
    pub llm: LlmSettings,

    /// Translation and question limits
    #[serde(default)]
    pub translation: TranslationSettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_translation()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Browser clients will be rejected."
            );
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;

        if llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.model".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        if llm.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.request_timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        let has_key = llm.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if !has_key {
            if self.environment.is_strict() {
                return Err(ConfigError::InvalidValue {
                    field: "llm.api_key".to_string(),
                    message: "API key must be set outside development".to_string(),
                });
            }
            tracing::warn!("llm.api_key is not configured; model calls will fail");
        }

        Ok(())
    }

    fn validate_translation(&self) -> Result<(), ConfigError> {
        let translation = &self.translation;

        if translation.max_lyrics_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "translation.max_lyrics_bytes".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if translation.qa_max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "translation.qa_max_output_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one translate or chat call, model call included
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_timeout() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default; the dev front end origin must be configured explicitly
            cors_origins: Vec::new(),
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible Responses API
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Falls back to OPENAI_API_KEY when unset
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// HTTP client timeout for one model call
    #[serde(default = "default_llm_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4.1".to_string()
}
fn default_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}
fn default_llm_timeout() -> u64 {
    90
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: default_api_key(),
            request_timeout_seconds: default_llm_timeout(),
        }
    }
}

/// Translation and follow-up question limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// Largest lyric submission accepted, in bytes
    #[serde(default = "default_max_lyrics_bytes")]
    pub max_lyrics_bytes: usize,

    /// Output cap for one follow-up answer
    #[serde(default = "default_qa_max_output_tokens")]
    pub qa_max_output_tokens: u32,
}

fn default_max_lyrics_bytes() -> usize {
    64 * 1024
}
fn default_qa_max_output_tokens() -> u32 {
    500
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            max_lyrics_bytes: default_max_lyrics_bytes(),
            qa_max_output_tokens: default_qa_max_output_tokens(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Prefix for environment overrides, e.g. `LYRIC_TUTOR_SERVER__PORT=9000`
const ENV_PREFIX: &str = "LYRIC_TUTOR";

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`LYRIC_TUTOR_` prefix, `__` between nested keys)
/// 2. config/{env}.{toml,yaml,json} (if env specified)
/// 3. config/default.{toml,yaml,json}
///
/// Missing files are skipped, so with no sources at all this yields the
/// built-in defaults. A source that fails to parse or validate is an error.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_with(env, environment_source(None))
}

fn environment_source(vars: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

fn load_settings_with(
    env: Option<&str>,
    environment: Environment,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(environment);

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> Settings {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("sk-test".to_string());
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.llm.model, "gpt-4.1");
        assert_eq!(settings.translation.qa_max_output_tokens, 500);
        assert_eq!(settings.environment, RuntimeEnvironment::Development);
    }

    #[test]
    fn test_server_validation() {
        let mut settings = with_key();

        settings.server.port = 0;
        assert!(settings.validate_server().is_err());
        settings.server.port = 8000;

        settings.server.timeout_seconds = 0;
        assert!(settings.validate_server().is_err());
        settings.server.timeout_seconds = 30;

        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_llm_validation() {
        let mut settings = with_key();

        settings.llm.model = "  ".to_string();
        assert!(settings.validate_llm().is_err());
        settings.llm.model = "gpt-4.1".to_string();

        settings.llm.request_timeout_seconds = 0;
        assert!(settings.validate_llm().is_err());
        settings.llm.request_timeout_seconds = 30;

        assert!(settings.validate_llm().is_ok());
    }

    #[test]
    fn test_missing_key_only_fatal_when_strict() {
        let mut settings = Settings::default();
        settings.llm.api_key = None;
        assert!(settings.validate_llm().is_ok());

        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate_llm().is_err());

        settings.llm.api_key = Some("sk-test".to_string());
        assert!(settings.validate_llm().is_ok());
    }

    #[test]
    fn test_translation_limits() {
        let mut settings = with_key();

        settings.translation.max_lyrics_bytes = 0;
        assert!(settings.validate_translation().is_err());
        settings.translation.max_lyrics_bytes = 1024;

        settings.translation.qa_max_output_tokens = 0;
        assert!(settings.validate_translation().is_err());
        settings.translation.qa_max_output_tokens = 500;

        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_shipped_default_file() {
        let settings: Settings =
            toml::from_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.llm.model, "gpt-4.1");
        assert_eq!(settings.translation.max_lyrics_bytes, 65536);
        assert_eq!(settings.server.cors_origins.len(), 2);
        assert!(settings.observability.metrics_enabled);
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_no_sources_yields_defaults() {
        let settings = load_settings_with(None, environment_source(vars(&[]))).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.environment, RuntimeEnvironment::Development);
    }

    #[test]
    fn test_env_override_with_single_underscore_prefix() {
        let settings = load_settings_with(
            None,
            environment_source(vars(&[
                ("LYRIC_TUTOR_SERVER__PORT", "9000"),
                ("LYRIC_TUTOR_LLM__MODEL", "gpt-4.1-mini"),
            ])),
        )
        .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.llm.model, "gpt-4.1-mini");
    }

    #[test]
    fn test_invalid_source_is_an_error_not_defaults() {
        let err = load_settings_with(
            None,
            environment_source(vars(&[
                ("LYRIC_TUTOR_ENVIRONMENT", "production"),
                ("LYRIC_TUTOR_SERVER__PORT", "0"),
            ])),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "server.port"
        ));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let json = r#"{"server": {"port": 9000}, "environment": "staging"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.timeout_seconds, 120);
        assert!(settings.environment.is_strict());
        assert!(!settings.environment.is_production());
    }
}
