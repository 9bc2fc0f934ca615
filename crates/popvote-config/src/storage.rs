use secrecy::SecretString;
use serde::Deserialize;

/// Object storage backend configuration
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum StorageConfig {
    /// Google Cloud Storage over the JSON API
    Gcs(GcsConfig),
    /// In-process store, for tests and local development
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Google Cloud Storage backend settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcsConfig {
    /// Bucket holding images and the vote tally document
    pub bucket: String,
    /// OAuth bearer token; optional for anonymous/emulator access
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Base URL override (emulator or test server)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}
