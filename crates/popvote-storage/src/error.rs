use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Object storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Conditional write lost to a concurrent writer
    #[error("write precondition failed for object '{0}'")]
    PreconditionFailed(String),

    /// Download response carried no usable generation
    ///
    /// Conditional writes cannot proceed without one: a default of 0 would
    /// read as "object must not exist" and fail every precondition.
    #[error("storage response for object '{0}' carried no generation")]
    MissingGeneration(String),

    /// Backend returned a non-success status
    #[error("storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection failure
    #[error("storage connection error: {0}")]
    Connection(String),
}
