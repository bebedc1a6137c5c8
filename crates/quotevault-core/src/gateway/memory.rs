//! In-memory [`QuoteBackend`] for tests.
//!
//! Enforces the same uniqueness rules as the remote schema: one favorite per
//! (user, quote) and one junction row per (collection, quote).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::{QuoteBackend, QuoteOrder, QuoteQuery};
use crate::models::{
    Category, CategoryId, Collection, CollectionId, CollectionQuote, CollectionQuoteId,
    Favorite, FavoriteId, FavoriteWithQuote, NewCollection, NewFavorite, ProfileUpdate, Quote,
    QuoteId, QuoteWithCategory, UserId, UserProfile, DEFAULT_FONT_SIZE,
};
use crate::{Error, Result};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    quotes: Vec<Quote>,
    favorites: Vec<Favorite>,
    collections: Vec<Collection>,
    collection_quotes: Vec<CollectionQuote>,
    profiles: HashMap<UserId, UserProfile>,
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    list_quote_calls: AtomicUsize,
}

impl MemoryBackend {
    /// Three categories and 33 quotes: 25 Motivation, 5 Wisdom, 3 Love
    pub fn with_catalog() -> Self {
        let backend = Self::default();
        let motivation = backend.add_category("Motivation");
        let wisdom = backend.add_category("Wisdom");
        let love = backend.add_category("Love");
        let mut minutes_ago = 0;
        for (category, count) in [(&motivation, 25), (&wisdom, 5), (&love, 3)] {
            for index in 0..count {
                minutes_ago += 1;
                backend.add_quote(
                    &format!("{} quote {index}", category.name),
                    &format!("{} Author {index}", category.name),
                    Some(category),
                    minutes_ago,
                    index,
                );
            }
        }
        backend
    }

    pub fn add_category(&self, name: &str) -> Category {
        let category = Category {
            id: CategoryId::new(),
            name: name.to_string(),
            icon: None,
            color: None,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().categories.push(category.clone());
        category
    }

    pub fn add_quote(
        &self,
        text: &str,
        author: &str,
        category: Option<&Category>,
        minutes_ago: i64,
        likes_count: i64,
    ) -> QuoteId {
        let quote = Quote {
            id: QuoteId::new(),
            text: text.to_string(),
            author: author.to_string(),
            author_image_url: None,
            category_id: category.map(|category| category.id),
            likes_count,
            comments_count: 0,
            is_quote_of_day: false,
            quote_of_day_date: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        };
        let id = quote.id;
        self.tables.lock().unwrap().quotes.push(quote);
        id
    }

    /// Insert a default profile row for `user`
    pub fn add_profile(&self, user: UserId, display_name: &str) -> UserProfile {
        let now = Utc::now();
        let profile = UserProfile {
            id: user,
            display_name: Some(display_name.to_string()),
            avatar_url: None,
            accent_color: "blue".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            theme: "auto".to_string(),
            notification_enabled: false,
            notification_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .unwrap()
            .profiles
            .insert(user, profile.clone());
        profile
    }

    pub fn category_named(&self, name: &str) -> Category {
        self.tables
            .lock()
            .unwrap()
            .categories
            .iter()
            .find(|category| category.name == name)
            .cloned()
            .unwrap()
    }

    pub fn quote_ids(&self) -> Vec<QuoteId> {
        self.tables
            .lock()
            .unwrap()
            .quotes
            .iter()
            .map(|quote| quote.id)
            .collect()
    }

    pub fn raw_quote(&self, id: QuoteId) -> Quote {
        self.tables
            .lock()
            .unwrap()
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .cloned()
            .unwrap()
    }

    pub fn favorite_rows(&self, user: UserId, quote: QuoteId) -> usize {
        self.tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|favorite| favorite.user_id == user && favorite.quote_id == quote)
            .count()
    }

    pub fn junction_rows(&self, collection: CollectionId) -> usize {
        self.tables
            .lock()
            .unwrap()
            .collection_quotes
            .iter()
            .filter(|entry| entry.collection_id == collection)
            .count()
    }

    /// Make every subsequent call fail with a server error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_quote_calls(&self) -> usize {
        self.list_quote_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Server("Service unavailable (503)".to_string()))
        } else {
            Ok(())
        }
    }

    fn joined(tables: &Tables, quote: &Quote) -> QuoteWithCategory {
        let category = quote.category_id.and_then(|id| {
            tables
                .categories
                .iter()
                .find(|category| category.id == id)
                .cloned()
        });
        QuoteWithCategory {
            quote: quote.clone(),
            category,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl QuoteBackend for MemoryBackend {
    async fn list_quotes(&self, query: &QuoteQuery) -> Result<Vec<QuoteWithCategory>> {
        self.list_quote_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<&Quote> = tables
            .quotes
            .iter()
            .filter(|quote| query.category.is_none() || quote.category_id == query.category)
            .filter(|quote| {
                query.search.as_deref().map_or(true, |term| {
                    contains_ignore_case(&quote.text, term) || contains_ignore_case(&quote.author, term)
                })
            })
            .collect();
        match query.order {
            QuoteOrder::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            QuoteOrder::MostLiked => rows.sort_by(|a, b| b.likes_count.cmp(&a.likes_count)),
        }
        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|quote| Self::joined(&tables, quote))
            .collect())
    }

    async fn get_quote(&self, id: QuoteId) -> Result<QuoteWithCategory> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        tables
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .map(|quote| Self::joined(&tables, quote))
            .ok_or_else(|| Error::NotFound(format!("quote {id}")))
    }

    async fn quotes_by_ids(&self, ids: &[QuoteId]) -> Result<Vec<QuoteWithCategory>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .quotes
            .iter()
            .filter(|quote| ids.contains(&quote.id))
            .map(|quote| Self::joined(&tables, quote))
            .collect())
    }

    async fn quote_for_date(&self, date: NaiveDate) -> Result<Option<QuoteWithCategory>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .quotes
            .iter()
            .find(|quote| quote.quote_of_day_date == Some(date))
            .map(|quote| Self::joined(&tables, quote)))
    }

    async fn first_unassigned_quote(&self) -> Result<Option<QuoteWithCategory>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .quotes
            .iter()
            .find(|quote| quote.quote_of_day_date.is_none())
            .map(|quote| Self::joined(&tables, quote)))
    }

    async fn first_quote(&self) -> Result<Option<QuoteWithCategory>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .quotes
            .first()
            .map(|quote| Self::joined(&tables, quote)))
    }

    async fn mark_quote_of_day(&self, id: QuoteId, date: NaiveDate) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(quote) = tables.quotes.iter_mut().find(|quote| quote.id == id) {
            quote.quote_of_day_date = Some(date);
            quote.is_quote_of_day = true;
        }
        Ok(())
    }

    async fn increment_likes(&self, id: QuoteId) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(quote) = tables.quotes.iter_mut().find(|quote| quote.id == id) {
            quote.likes_count += 1;
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.check()?;
        let mut categories = self.tables.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_favorites(&self, user: UserId) -> Result<Vec<FavoriteWithQuote>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut favorites: Vec<FavoriteWithQuote> = tables
            .favorites
            .iter()
            .filter(|favorite| favorite.user_id == user)
            .filter_map(|favorite| {
                let quote = tables
                    .quotes
                    .iter()
                    .find(|quote| quote.id == favorite.quote_id)?;
                Some(FavoriteWithQuote {
                    id: favorite.id,
                    user_id: favorite.user_id,
                    quote_id: favorite.quote_id,
                    created_at: favorite.created_at,
                    quote: Self::joined(&tables, quote),
                })
            })
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    async fn favorite_quote_ids(&self, user: UserId) -> Result<Vec<QuoteId>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|favorite| favorite.user_id == user)
            .map(|favorite| favorite.quote_id)
            .collect())
    }

    async fn is_favorited(&self, user: UserId, quote: QuoteId) -> Result<bool> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .any(|favorite| favorite.user_id == user && favorite.quote_id == quote))
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .favorites
            .iter()
            .any(|row| row.user_id == favorite.user_id && row.quote_id == favorite.quote_id)
        {
            return Err(Error::Server(
                "duplicate key value violates unique constraint (409)".to_string(),
            ));
        }
        let created_at = next_timestamp(tables.favorites.iter().map(|row| row.created_at).max());
        tables.favorites.push(Favorite {
            id: FavoriteId::new(),
            user_id: favorite.user_id,
            quote_id: favorite.quote_id,
            created_at,
        });
        Ok(())
    }

    async fn remove_favorite(&self, user: UserId, quote: QuoteId) -> Result<()> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .favorites
            .retain(|favorite| !(favorite.user_id == user && favorite.quote_id == quote));
        Ok(())
    }

    async fn list_collections(&self, user: UserId) -> Result<Vec<Collection>> {
        self.check()?;
        let mut collections: Vec<Collection> = self
            .tables
            .lock()
            .unwrap()
            .collections
            .iter()
            .filter(|collection| collection.user_id == user)
            .cloned()
            .collect();
        collections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(collections)
    }

    async fn count_collection_quotes(&self, collection: CollectionId) -> Result<usize> {
        self.check()?;
        Ok(self.junction_rows(collection))
    }

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let created_at = next_timestamp(tables.collections.iter().map(|row| row.created_at).max());
        let row = Collection {
            id: CollectionId::new(),
            user_id: collection.user_id,
            name: collection.name,
            cover_image_url: collection.cover_image_url,
            created_at,
            updated_at: created_at,
        };
        tables.collections.push(row.clone());
        Ok(row)
    }

    async fn rename_collection(
        &self,
        id: CollectionId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(collection) = tables.collections.iter_mut().find(|row| row.id == id) {
            collection.name = name.to_string();
            collection.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_collection(&self, id: CollectionId) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        // cascade
        tables
            .collection_quotes
            .retain(|entry| entry.collection_id != id);
        tables.collections.retain(|collection| collection.id != id);
        Ok(())
    }

    async fn list_collection_entries(
        &self,
        collection: CollectionId,
    ) -> Result<Vec<CollectionQuote>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .collection_quotes
            .iter()
            .filter(|entry| entry.collection_id == collection)
            .cloned()
            .collect())
    }

    async fn add_collection_quote(&self, collection: CollectionId, quote: QuoteId) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .collection_quotes
            .iter()
            .any(|entry| entry.collection_id == collection && entry.quote_id == quote)
        {
            return Err(Error::Server(
                "duplicate key value violates unique constraint (409)".to_string(),
            ));
        }
        tables.collection_quotes.push(CollectionQuote {
            id: CollectionQuoteId::new(),
            collection_id: collection,
            quote_id: quote,
            added_at: Utc::now(),
        });
        Ok(())
    }

    async fn remove_collection_quote(
        &self,
        collection: CollectionId,
        quote: QuoteId,
    ) -> Result<()> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .collection_quotes
            .retain(|entry| !(entry.collection_id == collection && entry.quote_id == quote));
        Ok(())
    }

    async fn collection_contains(&self, collection: CollectionId, quote: QuoteId) -> Result<bool> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .collection_quotes
            .iter()
            .any(|entry| entry.collection_id == collection && entry.quote_id == quote))
    }

    async fn get_profile(&self, user: UserId) -> Result<UserProfile> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .profiles
            .get(&user)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("profile {user}")))
    }

    async fn update_profile(&self, user: UserId, update: &ProfileUpdate) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let profile = tables
            .profiles
            .get_mut(&user)
            .ok_or_else(|| Error::NotFound(format!("profile {user}")))?;
        update.apply_to(profile);
        profile.updated_at = Utc::now();
        Ok(())
    }
}

// Strictly increasing creation times keep "newest first" ordering stable.
fn next_timestamp(latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match latest {
        Some(latest) if latest >= now => latest + Duration::milliseconds(1),
        _ => now,
    }
}
