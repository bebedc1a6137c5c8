//! Collection model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionId, CollectionQuoteId, QuoteId, UserId};

/// A user-owned collection row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub user_id: UserId,
    pub name: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A collection together with the number of quotes linked to it.
///
/// The count is computed from junction rows when fetched and adjusted
/// locally afterwards, so it can drift from the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionWithCount {
    #[serde(flatten)]
    pub collection: Collection,
    pub quote_count: usize,
}

impl CollectionWithCount {
    #[must_use]
    pub const fn new(collection: Collection, quote_count: usize) -> Self {
        Self {
            collection,
            quote_count,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CollectionId {
        self.collection.id
    }

    pub fn record_quote_added(&mut self) {
        self.quote_count += 1;
    }

    pub fn record_quote_removed(&mut self) {
        self.quote_count = self.quote_count.saturating_sub(1);
    }
}

/// Junction row linking a collection and a quote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionQuote {
    pub id: CollectionQuoteId,
    pub collection_id: CollectionId,
    pub quote_id: QuoteId,
    pub added_at: DateTime<Utc>,
}

/// Insert payload for a new collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCollection {
    pub name: String,
    pub user_id: UserId,
    pub cover_image_url: Option<String>,
}

impl NewCollection {
    /// Build an insert payload, rejecting blank names
    pub fn new(name: &str, user_id: UserId) -> crate::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Collection name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            user_id,
            cover_image_url: None,
        })
    }
}
