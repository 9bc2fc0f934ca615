use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use popvote_core::{HttpError, Message};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Speech transcription proxy errors
#[derive(Debug, Error)]
pub enum SttError {
    /// The multipart form carried no `audio_file` field
    #[error("'audio_file' not found in request form data")]
    MissingAudio,

    /// Multipart form could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication with the speech API failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Speech API returned an error
    #[error("Speech-to-Text API error ({status}): {message}")]
    UpstreamApiError { status: u16, message: String },

    /// Network or timeout failure reaching the speech API
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Response could not be interpreted
    #[error("Internal server error")]
    InternalError,
}

impl HttpError for SttError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAudio | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::UpstreamApiError { status, .. } => match *status {
                400 => StatusCode::BAD_REQUEST,
                401 | 403 => StatusCode::UNAUTHORIZED,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::ConnectionError(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for SttError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(Message::new(self.client_message()))).into_response()
    }
}
