use secrecy::SecretString;
use serde::Deserialize;

/// OpenAI configuration shared by the chat and image generation endpoints
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Chat completion model
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Image generation model
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Chat completion timeout in seconds
    #[serde(default = "default_chat_timeout_secs")]
    pub chat_timeout_secs: u64,
    /// Image generation timeout in seconds
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_chat_timeout_secs() -> u64 {
    180
}

fn default_image_timeout_secs() -> u64 {
    300
}
