use serde::Serialize;

/// JSON body shape shared by status and error responses: `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
