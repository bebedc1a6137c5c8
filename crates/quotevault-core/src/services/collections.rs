//! Collection reads that span more than one table.

use crate::gateway::QuoteBackend;
use crate::models::{CollectionId, CollectionWithCount, QuoteId, QuoteWithCategory, UserId};
use crate::Result;

/// Collections of `user`, newest first, each with its live junction-row count.
pub async fn fetch_collections(
    backend: &dyn QuoteBackend,
    user: UserId,
) -> Result<Vec<CollectionWithCount>> {
    let collections = backend.list_collections(user).await?;
    let mut counted = Vec::with_capacity(collections.len());
    for collection in collections {
        let count = backend.count_collection_quotes(collection.id).await?;
        counted.push(CollectionWithCount::new(collection, count));
    }
    Ok(counted)
}

/// Quotes linked to `collection`.
pub async fn fetch_collection_quotes(
    backend: &dyn QuoteBackend,
    collection: CollectionId,
) -> Result<Vec<QuoteWithCategory>> {
    let quote_ids: Vec<QuoteId> = backend
        .list_collection_entries(collection)
        .await?
        .into_iter()
        .map(|entry| entry.quote_id)
        .collect();
    if quote_ids.is_empty() {
        return Ok(Vec::new());
    }
    backend.quotes_by_ids(&quote_ids).await
}
