use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::{Generation, Object, ObjectStore, Result, StorageError};

/// In-process object store
///
/// Backs tests and local development. Generation semantics mirror the GCS
/// backend: each write bumps the object's generation, and conditional writes
/// are checked atomically under the map's shard lock.
#[derive(Default)]
pub struct MemoryStore {
    objects: DashMap<String, StoredObject>,
}

#[derive(Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    generation: Generation,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.contains_key(name))
    }

    async fn get(&self, name: &str) -> Result<Option<Object>> {
        Ok(self.objects.get(name).map(|stored| Object {
            data: stored.data.clone(),
            content_type: Some(stored.content_type.clone()),
            generation: stored.generation,
        }))
    }

    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        match self.objects.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                let next = occupied.get().generation + 1;
                occupied.insert(StoredObject {
                    data,
                    content_type: content_type.to_string(),
                    generation: next,
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredObject {
                    data,
                    content_type: content_type.to_string(),
                    generation: 1,
                });
            }
        }
        Ok(())
    }

    async fn put_if_generation(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        generation: Generation,
    ) -> Result<()> {
        match self.objects.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().generation != generation {
                    return Err(StorageError::PreconditionFailed(name.to_string()));
                }
                occupied.insert(StoredObject {
                    data,
                    content_type: content_type.to_string(),
                    generation: generation + 1,
                });
            }
            Entry::Vacant(vacant) => {
                if generation != 0 {
                    return Err(StorageError::PreconditionFailed(name.to_string()));
                }
                vacant.insert(StoredObject {
                    data,
                    content_type: content_type.to_string(),
                    generation: 1,
                });
            }
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        // GCS lists lexicographically; keep the same order
        names.sort_unstable();
        Ok(names)
    }
}
