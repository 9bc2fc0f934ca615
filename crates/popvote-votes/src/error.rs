use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use popvote_core::{HttpError, Message};
use popvote_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VoteError>;

/// Voting and image retrieval errors
#[derive(Debug, Error)]
pub enum VoteError {
    /// A required query parameter was absent or empty
    #[error("\"{0}\" is missing")]
    MissingParameter(&'static str),

    /// The voted item has no image blob under the target prefix
    #[error("voted item image \"{0}\" not found")]
    TargetNotFound(String),

    /// Neither image location holds a blob with this name
    #[error("image \"{0}\" not found")]
    ImageNotFound(String),

    /// The tally document does not exist yet
    #[error("vote tally not found")]
    TallyNotFound,

    /// The tally document exists but is not valid JSON
    #[error("vote tally document is unreadable")]
    TallyUnreadable,

    /// Conditional writes kept losing to concurrent voters
    #[error("vote write conflicted with concurrent voters, try again")]
    Contention,

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HttpError for VoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::TargetNotFound(_) | Self::ImageNotFound(_) | Self::TallyNotFound => StatusCode::NOT_FOUND,
            Self::Contention | Self::Storage(StorageError::PreconditionFailed(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::TallyUnreadable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(Message::new(self.client_message()))).into_response()
    }
}
