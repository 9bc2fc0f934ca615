use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use popvote_core::{HttpError, Message};
use popvote_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Image generation proxy errors
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// The prompt query parameter was absent or empty
    #[error("\"prompt\" is missing")]
    MissingPrompt,

    /// Upstream rejected the request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication with the upstream API failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Upstream API returned an error
    #[error("Image API error ({status}): {message}")]
    UpstreamApiError { status: u16, message: String },

    /// Network or timeout failure reaching the upstream API
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Saving the generated image failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Response could not be interpreted
    #[error("Internal server error")]
    InternalError,
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPrompt | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::UpstreamApiError { status, .. } => match *status {
                400 => StatusCode::BAD_REQUEST,
                401 => StatusCode::UNAUTHORIZED,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::ConnectionError(_) | Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(Message::new(self.client_message()))).into_response()
    }
}
