//! # Configuration Management
//!
//! This module handles loading and managing application configuration from multiple sources:
//! - TOML configuration files (config.toml)
//! - Environment variables (with APP_ prefix)
//! - Default values (built into the code)
//!
//! ## Key Rust Concepts Used:
//! - **Serde**: Serialization/deserialization library for converting between Rust structs and data formats
//! - **derive macros**: Automatically generate code for common traits (Debug, Clone, Serialize, Deserialize)
//! - **Result<T, E>**: Error handling that forces you to handle potential failures
//!
//! ## Configuration Priority (highest to lowest):
//! 1. Environment variables (APP_SERVER_HOST, ASSEMBLYAI_API_KEY, etc.)
//! 2. Configuration file (config.toml)
//! 3. Default values (defined in the Default impl)

use anyhow::Result;              // Better error handling with context
use serde::{Deserialize, Serialize};  // For converting to/from TOML, JSON, etc.
use std::env;                    // For reading environment variables

/// Main application configuration that contains all settings.
///
/// ## Why separate config structs:
/// Breaking configuration into logical groups (server, transcription, media)
/// makes it easier to understand and maintain as the application grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub transcription: TranscriptionConfig,
    pub media: MediaConfig,
}

/// Server-specific configuration settings.
///
/// ## Fields:
/// - `host`: IP address or hostname to bind the server to (e.g., "127.0.0.1", "0.0.0.0")
/// - `port`: TCP port number to listen on (1-65535, typically 8080 for development)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,  // u16 = unsigned 16-bit integer (0-65535), perfect for port numbers
}

/// Settings for the external transcription service.
///
/// ## Fields:
/// - `api_key`: AssemblyAI credential; read from the ASSEMBLYAI_API_KEY environment
///   variable at startup and required for the service to run
/// - `base_url`: API root, overridable so tests can point at a local stub server
/// - `speech_models`: model names in preference order; the service picks the first
///   one available for the account
/// - `language_detection`: let the service detect the spoken language automatically
/// - `poll_interval_secs`: how often to poll a pending transcript job
/// - `request_timeout_secs`: upper bound on any single HTTP round trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub api_key: String,
    pub base_url: String,
    pub speech_models: Vec<String>,
    pub language_detection: bool,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

/// Settings for audio extraction from video uploads.
///
/// ## Fields:
/// - `ffmpeg_path`: name or path of the ffmpeg binary (must be on PATH if bare)
/// - `audio_quality`: LAME variable-bitrate quality level passed as `-q:a`
///   (0 = best/largest, 9 = worst/smallest; 2 is transparent for speech)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub ffmpeg_path: String,
    pub audio_quality: u8,
}

/// Provides default configuration values.
///
/// ## Why defaults matter:
/// Default values ensure the application can start even if no configuration file exists.
/// They also serve as documentation of reasonable starting values.
/// The API key intentionally has no usable default; validation rejects an empty key.
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),  // Localhost only (safe for development)
                port: 8080,                     // Common development port
            },
            transcription: TranscriptionConfig {
                api_key: String::new(),
                base_url: "https://api.assemblyai.com".to_string(),
                speech_models: vec![
                    "universal-3-pro".to_string(),
                    "universal-2".to_string(),
                ],
                language_detection: true,
                poll_interval_secs: 3,
                request_timeout_secs: 600,  // Long recordings can take minutes server-side
            },
            media: MediaConfig {
                ffmpeg_path: "ffmpeg".to_string(),
                audio_quality: 2,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources in priority order.
    ///
    /// ## Configuration Loading Process:
    /// 1. Start with built-in defaults
    /// 2. Override with values from config.toml (if it exists)
    /// 3. Override with environment variables prefixed with APP_
    /// 4. Handle special cases for HOST, PORT and ASSEMBLYAI_API_KEY
    ///
    /// ## Environment Variable Examples:
    /// - `APP_SERVER_HOST=0.0.0.0`: Override server host
    /// - `ASSEMBLYAI_API_KEY=...`: The transcription service credential
    /// - `HOST=0.0.0.0` / `PORT=3000`: Special cases for deployment platforms
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            // 1. Start with defaults - converts our Default impl to config format
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // 2. Load from config.toml file (if it exists) - required(false) means "don't error if missing"
            .add_source(config::File::with_name("config").required(false))
            // 3. Load from environment variables with APP_ prefix
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        // Handle special environment variables used by deployment platforms
        // These don't follow the APP_ prefix convention but are commonly used
        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        // The transcription credential lives under its service-specific name
        if let Ok(key) = env::var("ASSEMBLYAI_API_KEY") {
            settings = settings.set_override("transcription.api_key", key)?;
        }

        // Build the final configuration and convert it back to our AppConfig struct
        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    ///
    /// ## What this checks:
    /// - Server port is not 0 (port 0 is reserved and can't be used)
    /// - The transcription API key is present (the service is useless without it)
    /// - The model preference list is not empty
    /// - The poll interval is not 0 (would hammer the API in a tight loop)
    ///
    /// ## Why validate:
    /// Catching configuration errors early prevents runtime failures and
    /// provides clear error messages about what's wrong.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.transcription.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "Transcription API key is not set (export ASSEMBLYAI_API_KEY)"
            ));
        }

        if self.transcription.speech_models.is_empty() {
            return Err(anyhow::anyhow!("At least one speech model must be configured"));
        }

        if self.transcription.poll_interval_secs == 0 {
            return Err(anyhow::anyhow!("Poll interval must be greater than 0"));
        }

        if self.media.ffmpeg_path.is_empty() {
            return Err(anyhow::anyhow!("ffmpeg path cannot be empty"));
        }

        Ok(())  // All validation passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;  // Import everything from the parent module

    fn config_with_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.transcription.api_key = "test-key".to_string();
        config
    }

    /// Test that the default configuration has expected values.
    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.transcription.base_url, "https://api.assemblyai.com");
        assert_eq!(
            config.transcription.speech_models,
            vec!["universal-3-pro", "universal-2"]
        );
        assert!(config.transcription.language_detection);
        assert_eq!(config.media.ffmpeg_path, "ffmpeg");
        assert_eq!(config.media.audio_quality, 2);
    }

    /// The default config has no credential, so it must fail validation.
    #[test]
    fn test_missing_api_key_rejected() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_with_key_is_valid() {
        assert!(config_with_key().validate().is_ok());
    }

    /// Test that validation catches invalid configurations.
    #[test]
    fn test_config_validation() {
        let mut config = config_with_key();
        config.server.port = 0;  // Invalid port
        assert!(config.validate().is_err());

        let mut config = config_with_key();
        config.transcription.speech_models.clear();
        assert!(config.validate().is_err());

        let mut config = config_with_key();
        config.transcription.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
