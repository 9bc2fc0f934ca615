use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use popvote_core::HttpError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat completion proxy errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// The prompt query parameter was absent or empty
    #[error("Prompt is missing.")]
    MissingPrompt,

    /// Authentication with the upstream API failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Upstream API returned an error
    #[error("Chat API error ({status}): {message}")]
    UpstreamApiError { status: u16, message: String },

    /// Network or timeout failure reaching the upstream API
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Response could not be interpreted
    #[error("Internal server error")]
    InternalError,
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::UpstreamApiError { status, .. } => match *status {
                400 => StatusCode::BAD_REQUEST,
                401 => StatusCode::UNAUTHORIZED,
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

/// This endpoint's failure body is `{"error": "..."}`, unlike the
/// `{"message": "..."}` shape used everywhere else
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}
