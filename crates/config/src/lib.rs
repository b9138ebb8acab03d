//! Configuration management for the lyric tutor
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables such as `LYRIC_TUTOR_SERVER__PORT=9000`
//!   (`LYRIC_TUTOR_` prefix, `__` between nested keys)

pub mod settings;

pub use settings::{
    load_settings, LlmSettings, ObservabilityConfig, RuntimeEnvironment, ServerConfig, Settings,
    TranslationSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
