use indexmap::IndexMap;
use popvote_storage::ObjectStore;

use crate::error::Result;
use crate::tally::TARGET_PREFIX;

/// Enumerate vote targets as `{file_name: 0, ...}`
///
/// The zero values are presentation scaffolding for clients expecting a
/// tally-shaped object; actual counts come from the tally document and are
/// merged client-side.
pub(crate) async fn list_targets(store: &dyn ObjectStore) -> Result<IndexMap<String, u64>> {
    let names = store.list(TARGET_PREFIX).await?;

    let mut targets = IndexMap::new();
    for name in names {
        let file_name = name.strip_prefix(TARGET_PREFIX).unwrap_or(&name);
        // The prefix marker itself lists as an empty name
        if !file_name.is_empty() {
            targets.insert(file_name.to_string(), 0);
        }
    }

    Ok(targets)
}
