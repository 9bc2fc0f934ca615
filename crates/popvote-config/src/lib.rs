#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod openai;
pub mod server;
pub mod speech;
pub mod storage;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use openai::*;
pub use server::*;
pub use speech::*;
pub use storage::*;

/// Top-level popvote configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// OpenAI configuration (chat and image generation)
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    /// Speech-to-text configuration
    #[serde(default)]
    pub speech: Option<SpeechConfig>,
}
