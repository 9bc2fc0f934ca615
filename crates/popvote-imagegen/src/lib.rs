#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod naming;
mod openai;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use popvote_config::OpenAiConfig;
use popvote_storage::ObjectStore;
use serde::{Deserialize, Serialize};

pub use error::{ImageGenError, Result};

use openai::ImageClient;

/// Destination prefix for generated images
///
/// Generated images land in the generic image store, where the artifact
/// retriever's fallback lookup finds them.
const IMAGE_PREFIX: &str = "images/";

/// Image generation endpoint state
pub struct Server {
    client: ImageClient,
    store: Arc<dyn ObjectStore>,
}

/// Build the image generation server from configuration
///
/// # Errors
///
/// Returns an error if the upstream client fails to initialize
pub fn build_server(config: &OpenAiConfig, store: Arc<dyn ObjectStore>) -> anyhow::Result<Arc<Server>> {
    let client = ImageClient::new(config)?;
    Ok(Arc::new(Server { client, store }))
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/generate_and_save_image", get(generate_and_save))
}

#[derive(Debug, Deserialize)]
struct GenerateQuery {
    prompt: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateOutcome {
    message: String,
    image_path: String,
}

/// Generate an image from a prompt and persist it to storage
async fn generate_and_save(
    State(server): State<Arc<Server>>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<GenerateOutcome>> {
    let prompt = query
        .prompt
        .filter(|prompt| !prompt.is_empty())
        .ok_or(ImageGenError::MissingPrompt)?;

    let bytes = server.client.generate(&prompt, query.size.as_deref()).await?;

    let file_name = naming::generated_file_name(&prompt, &jiff::Zoned::now());
    server
        .store
        .put(&format!("{IMAGE_PREFIX}{file_name}"), bytes, "image/png")
        .await?;

    tracing::info!(file_name, "generated image saved");

    Ok(Json(GenerateOutcome {
        message: format!("Image \"{file_name}\" generated and uploaded."),
        image_path: file_name,
    }))
}
