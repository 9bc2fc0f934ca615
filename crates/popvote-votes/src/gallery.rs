use popvote_storage::{Object, ObjectStore};

use crate::error::{Result, VoteError};
use crate::tally::TARGET_PREFIX;

/// Prefix of the generic image store, also where generated images land
pub const IMAGE_PREFIX: &str = "images/";

/// Fetch an image blob by file name
///
/// Looks under the vote-target prefix first, then falls back to the generic
/// image store. Returns the raw bytes and a content type inferred from the
/// file name.
pub(crate) async fn fetch_image(store: &dyn ObjectStore, name: &str) -> Result<(Vec<u8>, String)> {
    let object = match store.get(&format!("{TARGET_PREFIX}{name}")).await? {
        Some(object) => object,
        None => lookup_fallback(store, name).await?,
    };

    Ok((object.data, popvote_core::content_type_for(name)))
}

async fn lookup_fallback(store: &dyn ObjectStore, name: &str) -> Result<Object> {
    store
        .get(&format!("{IMAGE_PREFIX}{name}"))
        .await?
        .ok_or_else(|| VoteError::ImageNotFound(name.to_string()))
}
