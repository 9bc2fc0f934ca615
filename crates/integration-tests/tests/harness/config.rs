//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use popvote_config::{Config, HealthConfig, OpenAiConfig, ServerConfig, SpeechConfig, StorageConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Uses the in-memory storage backend and leaves the upstream AI
    /// endpoints disabled.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    cors: None,
                },
                storage: StorageConfig::Memory,
                openai: None,
                speech: None,
            },
        }
    }

    /// Enable chat and image generation against a mock OpenAI backend
    pub fn with_openai(mut self, base_url: &str) -> Self {
        self.config.openai = Some(OpenAiConfig {
            api_key: SecretString::from("test-key"),
            base_url: Some(base_url.to_owned()),
            chat_model: "gpt-4o".to_owned(),
            image_model: "gpt-image-1".to_owned(),
            chat_timeout_secs: 30,
            image_timeout_secs: 30,
        });
        self
    }

    /// Enable transcription against a mock Speech-to-Text backend
    pub fn with_speech(mut self, base_url: &str) -> Self {
        self.config.speech = Some(SpeechConfig {
            api_key: SecretString::from("test-key"),
            base_url: Some(base_url.to_owned()),
            language_code: "ja-JP".to_owned(),
            sample_rate_hertz: 48_000,
            timeout_secs: 30,
        });
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
