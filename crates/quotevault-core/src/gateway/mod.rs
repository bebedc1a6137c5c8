//! Remote data gateway.
//!
//! [`QuoteBackend`] is the set of typed per-resource calls the services and
//! view-models depend on. [`SupabaseGateway`] implements it against the
//! PostgREST endpoint; tests use an in-memory implementation.

#[cfg(test)]
pub(crate) mod memory;
mod query;
mod quotes_api;
mod supabase;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    Category, Collection, CollectionId, CollectionQuote, FavoriteWithQuote, NewCollection,
    NewFavorite, ProfileUpdate, QuoteId, QuoteWithCategory, UserId, UserProfile,
};
use crate::Result;

pub use query::{QuoteOrder, QuoteQuery, DEFAULT_PAGE_SIZE};
pub use quotes_api::{QuotesApiClient, DEFAULT_QUOTES_API_URL};
pub use supabase::SupabaseGateway;

/// Typed calls against the remote tables.
///
/// Implementations perform exactly one round-trip per call and never retry.
#[async_trait]
pub trait QuoteBackend: Send + Sync {
    async fn list_quotes(&self, query: &QuoteQuery) -> Result<Vec<QuoteWithCategory>>;

    /// Errors with `NotFound` when no row has this id
    async fn get_quote(&self, id: QuoteId) -> Result<QuoteWithCategory>;

    async fn quotes_by_ids(&self, ids: &[QuoteId]) -> Result<Vec<QuoteWithCategory>>;

    async fn quote_for_date(&self, date: NaiveDate) -> Result<Option<QuoteWithCategory>>;

    /// First quote never featured as quote of the day
    async fn first_unassigned_quote(&self) -> Result<Option<QuoteWithCategory>>;

    /// Any quote at all
    async fn first_quote(&self) -> Result<Option<QuoteWithCategory>>;

    async fn mark_quote_of_day(&self, id: QuoteId, date: NaiveDate) -> Result<()>;

    async fn increment_likes(&self, id: QuoteId) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn list_favorites(&self, user: UserId) -> Result<Vec<FavoriteWithQuote>>;

    async fn favorite_quote_ids(&self, user: UserId) -> Result<Vec<QuoteId>>;

    async fn is_favorited(&self, user: UserId, quote: QuoteId) -> Result<bool>;

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<()>;

    async fn remove_favorite(&self, user: UserId, quote: QuoteId) -> Result<()>;

    async fn list_collections(&self, user: UserId) -> Result<Vec<Collection>>;

    async fn count_collection_quotes(&self, collection: CollectionId) -> Result<usize>;

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection>;

    async fn rename_collection(
        &self,
        id: CollectionId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Removes the collection; its junction rows go with it through the
    /// `ON DELETE CASCADE` foreign key
    async fn delete_collection(&self, id: CollectionId) -> Result<()>;

    async fn list_collection_entries(
        &self,
        collection: CollectionId,
    ) -> Result<Vec<CollectionQuote>>;

    async fn add_collection_quote(&self, collection: CollectionId, quote: QuoteId) -> Result<()>;

    async fn remove_collection_quote(
        &self,
        collection: CollectionId,
        quote: QuoteId,
    ) -> Result<()>;

    async fn collection_contains(&self, collection: CollectionId, quote: QuoteId) -> Result<bool>;

    async fn get_profile(&self, user: UserId) -> Result<UserProfile>;

    async fn update_profile(&self, user: UserId, update: &ProfileUpdate) -> Result<()>;
}

/// Shared access token slot.
///
/// The session manager writes it on sign-in and clears it on sign-out; the
/// gateway reads it for every request.
#[derive(Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl BearerToken {
    pub fn set(&self, token: impl Into<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.get().is_some() {
            "[REDACTED]"
        } else {
            "none"
        };
        formatter.debug_tuple("BearerToken").field(&state).finish()
    }
}
