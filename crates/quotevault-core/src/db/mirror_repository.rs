//! Local mirror repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{CollectionId, CollectionWithCount, QuoteId, QuoteWithCategory, UserId};

/// A mirrored record and when it was written locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    pub record: T,
    pub cached_at: DateTime<Utc>,
}

/// Trait for mirror storage operations (async)
#[allow(async_fn_in_trait)]
pub trait MirrorRepository {
    /// Insert or replace a quote keyed by its id
    async fn upsert_quote(&self, quote: &QuoteWithCategory, cached_at: DateTime<Utc>)
        -> Result<()>;

    async fn get_quote(&self, id: QuoteId) -> Result<Option<Cached<QuoteWithCategory>>>;

    /// Mirrored quotes, newest first
    async fn list_quotes(&self, limit: usize) -> Result<Vec<QuoteWithCategory>>;

    /// Returns whether a row was removed
    async fn delete_quote(&self, id: QuoteId) -> Result<bool>;

    /// Insert or replace a collection keyed by its id
    async fn upsert_collection(
        &self,
        collection: &CollectionWithCount,
        cached_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn get_collection(&self, id: CollectionId)
        -> Result<Option<Cached<CollectionWithCount>>>;

    /// Mirrored collections of one user, newest first
    async fn list_collections(&self, user: UserId) -> Result<Vec<CollectionWithCount>>;

    async fn delete_collection(&self, id: CollectionId) -> Result<bool>;
}

/// libSQL implementation of `MirrorRepository`
pub struct LibSqlMirrorRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlMirrorRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl MirrorRepository for LibSqlMirrorRepository<'_> {
    async fn upsert_quote(
        &self,
        quote: &QuoteWithCategory,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(quote)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO cached_quotes (id, payload, created_at, cached_at)
                 VALUES (?, ?, ?, ?)",
                params![
                    quote.id().as_str(),
                    payload,
                    quote.quote.created_at.timestamp_millis(),
                    cached_at.timestamp_millis()
                ],
            )
            .await?;
        Ok(())
    }

    async fn get_quote(&self, id: QuoteId) -> Result<Option<Cached<QuoteWithCategory>>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload, cached_at FROM cached_quotes WHERE id = ?",
                [id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(parse_cached(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_quotes(&self, limit: usize) -> Result<Vec<QuoteWithCategory>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM cached_quotes ORDER BY created_at DESC LIMIT ?",
                [limit as i64],
            )
            .await?;

        let mut quotes = Vec::new();
        while let Some(row) = rows.next().await? {
            let payload: String = row.get(0)?;
            quotes.push(serde_json::from_str(&payload)?);
        }
        Ok(quotes)
    }

    async fn delete_quote(&self, id: QuoteId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM cached_quotes WHERE id = ?", [id.as_str()])
            .await?;
        Ok(affected > 0)
    }

    async fn upsert_collection(
        &self,
        collection: &CollectionWithCount,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(collection)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO cached_collections (id, user_id, payload, created_at, cached_at)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    collection.id().as_str(),
                    collection.collection.user_id.as_str(),
                    payload,
                    collection.collection.created_at.timestamp_millis(),
                    cached_at.timestamp_millis()
                ],
            )
            .await?;
        Ok(())
    }

    async fn get_collection(
        &self,
        id: CollectionId,
    ) -> Result<Option<Cached<CollectionWithCount>>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload, cached_at FROM cached_collections WHERE id = ?",
                [id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(parse_cached(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_collections(&self, user: UserId) -> Result<Vec<CollectionWithCount>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM cached_collections WHERE user_id = ? ORDER BY created_at DESC",
                [user.as_str()],
            )
            .await?;

        let mut collections = Vec::new();
        while let Some(row) = rows.next().await? {
            let payload: String = row.get(0)?;
            collections.push(serde_json::from_str(&payload)?);
        }
        Ok(collections)
    }

    async fn delete_collection(&self, id: CollectionId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM cached_collections WHERE id = ?", [id.as_str()])
            .await?;
        Ok(affected > 0)
    }
}

fn parse_cached<T: serde::de::DeserializeOwned>(row: &libsql::Row) -> Result<Cached<T>> {
    let payload: String = row.get(0)?;
    let cached_at: i64 = row.get(1)?;
    Ok(Cached {
        record: serde_json::from_str(&payload)?,
        cached_at: DateTime::from_timestamp_millis(cached_at).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::Database;
    use crate::models::{Collection, Quote};

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn quote(text: &str, minutes_ago: i64) -> QuoteWithCategory {
        QuoteWithCategory {
            quote: Quote {
                id: QuoteId::new(),
                text: text.to_string(),
                author: "Anonymous".to_string(),
                author_image_url: None,
                category_id: None,
                likes_count: 0,
                comments_count: 0,
                is_quote_of_day: false,
                quote_of_day_date: None,
                created_at: Utc::now() - Duration::minutes(minutes_ago),
            },
            category: None,
        }
    }

    fn collection(user: UserId, name: &str, minutes_ago: i64) -> CollectionWithCount {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        CollectionWithCount::new(
            Collection {
                id: CollectionId::new(),
                user_id: user,
                name: name.to_string(),
                cover_image_url: None,
                created_at,
                updated_at: created_at,
            },
            2,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_replaces_previous_quote() {
        let db = setup().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        let mut original = quote("first", 5);
        repo.upsert_quote(&original, Utc::now()).await.unwrap();

        original.quote.likes_count = 42;
        let cached_at = Utc::now();
        repo.upsert_quote(&original, cached_at).await.unwrap();

        let cached = repo.get_quote(original.id()).await.unwrap().unwrap();
        assert_eq!(cached.record, original);
        assert_eq!(
            cached.cached_at.timestamp_millis(),
            cached_at.timestamp_millis()
        );
        assert_eq!(repo.list_quotes(10).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_quotes_newest_first() {
        let db = setup().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        let older = quote("older", 10);
        let newer = quote("newer", 1);
        repo.upsert_quote(&older, Utc::now()).await.unwrap();
        repo.upsert_quote(&newer, Utc::now()).await.unwrap();

        let listed = repo.list_quotes(10).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_quote() {
        let db = setup().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        let entry = quote("gone", 1);
        repo.upsert_quote(&entry, Utc::now()).await.unwrap();

        assert!(repo.delete_quote(entry.id()).await.unwrap());
        assert!(!repo.delete_quote(entry.id()).await.unwrap());
        assert!(repo.get_quote(entry.id()).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_collections_scoped_by_user() {
        let db = setup().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        let owner = UserId::new();
        let wisdom = collection(owner, "Wisdom", 10);
        let travel = collection(owner, "Travel", 1);
        let other = collection(UserId::new(), "Other", 1);
        for entry in [&wisdom, &travel, &other] {
            repo.upsert_collection(entry, Utc::now()).await.unwrap();
        }

        let listed = repo.list_collections(owner).await.unwrap();
        assert_eq!(listed, vec![travel.clone(), wisdom]);

        assert!(repo.delete_collection(travel.id()).await.unwrap());
        assert!(repo.get_collection(travel.id()).await.unwrap().is_none());
        assert_eq!(repo.list_collections(owner).await.unwrap().len(), 1);
    }
}
