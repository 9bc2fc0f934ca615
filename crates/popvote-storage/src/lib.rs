#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod gcs;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use popvote_config::StorageConfig;

pub use error::{Result, StorageError};
pub use gcs::GcsStore;
pub use memory::MemoryStore;

/// Object generation as reported by the backend
///
/// Used as an optimistic-concurrency token: a conditional write names the
/// generation observed at read time, with 0 meaning "object must not exist".
pub type Generation = i64;

/// A downloaded object with its concurrency token
#[derive(Debug, Clone)]
pub struct Object {
    /// Raw object bytes
    pub data: Vec<u8>,
    /// Content type recorded at upload time, if any
    pub content_type: Option<String>,
    /// Generation at download time
    pub generation: Generation,
}

/// Capability interface over the object-storage bucket
///
/// Implemented by the GCS JSON-API client and by the in-memory store used in
/// tests and local development. Both honor the same generation semantics so
/// the vote tally's conditional writes behave identically against either.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object with this name exists
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Download an object in full, or `None` if absent
    async fn get(&self, name: &str) -> Result<Option<Object>>;

    /// Upload an object, overwriting unconditionally
    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Upload an object only if its current generation matches
    ///
    /// A `generation` of 0 requires the object to be absent. Fails with
    /// [`StorageError::PreconditionFailed`] when another writer got there
    /// first.
    async fn put_if_generation(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        generation: Generation,
    ) -> Result<()>;

    /// List all object names under a prefix, paging through every result
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Build the storage backend selected by configuration
///
/// # Errors
///
/// Returns an error if the backend client fails to initialize
pub fn build_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::Gcs(gcs) => Ok(Arc::new(GcsStore::new(gcs)?)),
        StorageConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
