//! Shared local mirror wrapper used across view-models and the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::{
    Cached, Database, LibSqlMirrorRepository, LibSqlScheduleRepository, MirrorRepository,
    ScheduleRepository,
};
use crate::models::{
    CollectionId, CollectionWithCount, QuoteId, QuoteWithCategory, ScheduledNotification, UserId,
};
use crate::Result;

/// Thread-safe handle to the on-device mirror.
///
/// Every write is an upsert keyed by record id; nothing is ever evicted.
#[derive(Clone)]
pub struct MirrorStore {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl MirrorStore {
    /// Open the mirror at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path).await?;
        tracing::debug!("Opened local mirror at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory mirror (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Backing file, `None` for in-memory mirrors.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Overwrite each quote's mirrored copy.
    pub async fn record_quotes(&self, quotes: &[QuoteWithCategory]) -> Result<usize> {
        let cached_at = Utc::now();
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        for quote in quotes {
            repo.upsert_quote(quote, cached_at).await?;
        }
        Ok(quotes.len())
    }

    pub async fn cached_quote(&self, id: QuoteId) -> Result<Option<Cached<QuoteWithCategory>>> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection()).get_quote(id).await
    }

    /// Mirrored quotes, newest first.
    pub async fn cached_quotes(&self, limit: usize) -> Result<Vec<QuoteWithCategory>> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection())
            .list_quotes(limit)
            .await
    }

    pub async fn forget_quote(&self, id: QuoteId) -> Result<bool> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection())
            .delete_quote(id)
            .await
    }

    /// Overwrite each collection's mirrored copy.
    pub async fn record_collections(&self, collections: &[CollectionWithCount]) -> Result<usize> {
        let cached_at = Utc::now();
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        for collection in collections {
            repo.upsert_collection(collection, cached_at).await?;
        }
        Ok(collections.len())
    }

    pub async fn cached_collection(
        &self,
        id: CollectionId,
    ) -> Result<Option<Cached<CollectionWithCount>>> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection())
            .get_collection(id)
            .await
    }

    /// Mirrored collections of `user`, newest first.
    pub async fn cached_collections(&self, user: UserId) -> Result<Vec<CollectionWithCount>> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection())
            .list_collections(user)
            .await
    }

    pub async fn forget_collection(&self, id: CollectionId) -> Result<bool> {
        let db = self.db.lock().await;
        LibSqlMirrorRepository::new(db.connection())
            .delete_collection(id)
            .await
    }

    pub async fn save_schedule(&self, notification: &ScheduledNotification) -> Result<()> {
        let db = self.db.lock().await;
        LibSqlScheduleRepository::new(db.connection())
            .save(notification)
            .await
    }

    pub async fn load_schedule(&self, id: &str) -> Result<Option<ScheduledNotification>> {
        let db = self.db.lock().await;
        LibSqlScheduleRepository::new(db.connection()).load(id).await
    }

    pub async fn delete_schedule(&self, id: &str) -> Result<bool> {
        let db = self.db.lock().await;
        LibSqlScheduleRepository::new(db.connection())
            .delete(id)
            .await
    }
}
