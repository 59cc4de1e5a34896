//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DISCOVERY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use discovery_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod document;
mod error;
mod server;
mod storage;
mod tts;
mod voice;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use document::DocumentConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;
pub use tts::TtsConfig;
pub use voice::VoiceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup (with agent turns and synthesis unconfigured).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared-password authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Reasoning service (Groq)
    #[serde(default)]
    pub ai: AiConfig,

    /// Speech synthesis (ElevenLabs)
    #[serde(default)]
    pub tts: TtsConfig,

    /// Data directory
    #[serde(default)]
    pub storage: StorageConfig,

    /// Voice turn timings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Agreement document branding and layout
    #[serde(default)]
    pub document: DocumentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DISCOVERY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DISCOVERY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DISCOVERY__AI__GROQ_API_KEY=...` -> `ai.groq_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DISCOVERY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.tts.validate()?;
        self.storage.validate()?;
        self.voice.validate()?;
        self.document.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "DISCOVERY__SERVER__PORT",
            "DISCOVERY__SERVER__ENVIRONMENT",
            "DISCOVERY__AUTH__APP_PASSWORD",
            "DISCOVERY__AUTH__SESSION_SECRET",
            "DISCOVERY__AI__GROQ_API_KEY",
            "DISCOVERY__VOICE__SILENCE_MS",
            "DISCOVERY__DOCUMENT__BRAND_NAME",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.document.brand_name, "11-8 AI");
        assert!(!config.ai.has_groq());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_values_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DISCOVERY__SERVER__PORT", "3000");
        env::set_var("DISCOVERY__AI__GROQ_API_KEY", "gsk_test");
        env::set_var("DISCOVERY__VOICE__SILENCE_MS", "2000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.ai.has_groq());
        assert_eq!(config.voice.silence_ms, 2000);
    }

    #[test]
    fn test_production_requires_password() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DISCOVERY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("APP_PASSWORD"))
        );
    }
}
