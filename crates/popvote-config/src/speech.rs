use secrecy::SecretString;
use serde::Deserialize;

/// Google Cloud Speech-to-Text configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// API key
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Recognition language (BCP-47)
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Sample rate the client records at
    #[serde(default = "default_sample_rate_hertz")]
    pub sample_rate_hertz: u32,
    /// Recognition timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language_code() -> String {
    "ja-JP".to_string()
}

fn default_sample_rate_hertz() -> u32 {
    48_000
}

fn default_timeout_secs() -> u64 {
    300
}
