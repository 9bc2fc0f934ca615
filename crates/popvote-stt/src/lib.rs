#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod google;
mod request;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
};
use popvote_config::SpeechConfig;
use popvote_core::Message;
use serde::Serialize;

pub use error::{Result, SttError};

use google::SpeechProvider;

/// Transcription endpoint state
pub struct Server {
    provider: SpeechProvider,
}

/// Build the transcription server from configuration
///
/// # Errors
///
/// Returns an error if the provider fails to initialize
pub fn build_server(config: &SpeechConfig) -> anyhow::Result<Arc<Server>> {
    let provider = SpeechProvider::new(config)?;
    Ok(Arc::new(Server { provider }))
}

/// Create the endpoint router for transcription
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/convert_audio", post(convert_audio))
        .layer(DefaultBodyLimit::max(request::BODY_LIMIT_BYTES))
}

#[derive(Debug, Serialize)]
struct TranscriptionReply {
    transcription: String,
    confidence: f32,
    message: String,
}

/// Handle audio transcription requests
async fn convert_audio(State(server): State<Arc<Server>>, multipart: Multipart) -> Result<Response> {
    let upload = request::extract_audio(multipart).await?;

    tracing::debug!(bytes = upload.data.len(), "transcription handler called");

    let Some(transcription) = server.provider.recognize(&upload.data).await? else {
        // The API recognized nothing; not an error for the client
        return Ok(Json(Message::new("No transcription results")).into_response());
    };

    Ok(Json(TranscriptionReply {
        transcription: transcription.transcript,
        confidence: transcription.confidence,
        message: "Success".to_string(),
    })
    .into_response())
}
