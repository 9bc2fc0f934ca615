use std::sync::Arc;

use indexmap::IndexMap;
use popvote_storage::{Generation, ObjectStore, StorageError};

use crate::error::{Result, VoteError};

/// Storage location of the tally document
pub const TALLY_OBJECT: &str = "votes/vote_counts.json";

/// Prefix under which vote-target images live
pub const TARGET_PREFIX: &str = "votes/images/";

const TALLY_CONTENT_TYPE: &str = "application/json";

/// Bound on read-increment-write cycles before giving up
///
/// Each precondition failure implies another voter's write landed in
/// between, so a voter can lose at most once per concurrent peer; eight
/// attempts covers realistic contention on a single tally document.
const MAX_WRITE_ATTEMPTS: u32 = 8;

/// Vote counts keyed by target file name, in document order
pub type TallyCounts = IndexMap<String, u64>;

/// Outcome of loading the tally document
///
/// `Missing` and `Corrupt` are distinct so the swallow-to-empty on the vote
/// path stays explicit; the read path surfaces `Corrupt` instead.
enum TallyRead {
    Document {
        counts: TallyCounts,
        generation: Generation,
    },
    Missing,
    Corrupt {
        generation: Generation,
    },
}

/// Read-increment-write vote tally over a single JSON document
///
/// Writes are conditional on the generation observed at read time and
/// retried on conflict, so concurrent voters cannot lose each other's
/// increments.
pub struct TallyStore {
    store: Arc<dyn ObjectStore>,
}

impl TallyStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<TallyRead> {
        match self.store.get(TALLY_OBJECT).await? {
            None => Ok(TallyRead::Missing),
            Some(object) => match serde_json::from_slice(&object.data) {
                Ok(counts) => Ok(TallyRead::Document {
                    counts,
                    generation: object.generation,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "tally document is not valid JSON");
                    Ok(TallyRead::Corrupt {
                        generation: object.generation,
                    })
                }
            },
        }
    }

    /// Record one vote for `item`
    ///
    /// The item must have an image blob under [`TARGET_PREFIX`]. Returns the
    /// item's updated count together with the full mapping as written.
    pub async fn record_vote(&self, item: &str) -> Result<(u64, TallyCounts)> {
        let target = format!("{TARGET_PREFIX}{item}");
        if !self.store.exists(&target).await? {
            return Err(VoteError::TargetNotFound(item.to_string()));
        }

        for attempt in 0..MAX_WRITE_ATTEMPTS {
            // A missing or unparseable document starts the tally over from
            // empty: availability wins over strictness for a low-stakes count.
            let (mut counts, generation) = match self.load().await? {
                TallyRead::Document { counts, generation } => (counts, generation),
                TallyRead::Missing => (TallyCounts::new(), 0),
                TallyRead::Corrupt { generation } => (TallyCounts::new(), generation),
            };

            let entry = counts.entry(item.to_string()).or_insert(0);
            *entry += 1;
            let count = *entry;

            let body = serde_json::to_vec_pretty(&counts)
                .map_err(|e| VoteError::Storage(StorageError::Connection(e.to_string())))?;

            match self
                .store
                .put_if_generation(TALLY_OBJECT, body, TALLY_CONTENT_TYPE, generation)
                .await
            {
                Ok(()) => {
                    tracing::debug!(item, count, "vote recorded");
                    return Ok((count, counts));
                }
                Err(StorageError::PreconditionFailed(_)) => {
                    tracing::debug!(item, attempt, "tally write lost to a concurrent voter, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(VoteError::Contention)
    }

    /// Read the current tally verbatim
    ///
    /// An absent document is a not-found result; an unparseable one is an
    /// error here, unlike on the vote path.
    pub async fn read(&self) -> Result<TallyCounts> {
        match self.load().await? {
            TallyRead::Document { counts, .. } => Ok(counts),
            TallyRead::Missing => Err(VoteError::TallyNotFound),
            TallyRead::Corrupt { .. } => Err(VoteError::TallyUnreadable),
        }
    }

    /// Reset the tally to an empty document
    ///
    /// Unconditional overwrite; destructive and irreversible.
    pub async fn clear(&self) -> Result<()> {
        self.store
            .put(TALLY_OBJECT, b"{}".to_vec(), TALLY_CONTENT_TYPE)
            .await?;
        Ok(())
    }
}
