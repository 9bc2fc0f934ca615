#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod openai;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use popvote_config::OpenAiConfig;
use serde::{Deserialize, Serialize};

pub use error::{ChatError, Result};

use openai::ChatProvider;

/// Chat endpoint state
pub struct Server {
    provider: ChatProvider,
}

/// Build the chat server from configuration
///
/// # Errors
///
/// Returns an error if the provider fails to initialize
pub fn build_server(config: &OpenAiConfig) -> anyhow::Result<Arc<Server>> {
    let provider = ChatProvider::new(config)?;
    Ok(Arc::new(Server { provider }))
}

/// Create the endpoint router for chat
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/chat_with_openai", get(chat))
}

#[derive(Debug, Deserialize)]
struct ChatQuery {
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    success: bool,
    reply: String,
}

/// Handle chat requests
async fn chat(
    State(server): State<Arc<Server>>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<ChatReply>> {
    let prompt = query
        .prompt
        .filter(|prompt| !prompt.is_empty())
        .ok_or(ChatError::MissingPrompt)?;

    let reply = server.provider.complete(&prompt).await?;

    Ok(Json(ChatReply { success: true, reply }))
}
