#![allow(clippy::must_use_candidate)]

mod error;
mod media;
mod message;

pub use error::HttpError;
pub use media::content_type_for;
pub use message::Message;
