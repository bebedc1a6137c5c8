//! Collections screen and the open collection's quote list.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::AppContext;
use crate::models::{CollectionId, CollectionWithCount, NewCollection, QuoteId, QuoteWithCategory};
use crate::observable::Published;
use crate::services::collections::{fetch_collection_quotes, fetch_collections};
use crate::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionsState {
    /// Newest first
    pub collections: Vec<CollectionWithCount>,
    /// Quotes of the collection last opened with `load_collection_quotes`
    pub collection_quotes: Vec<QuoteWithCategory>,
    pub open_collection: Option<CollectionId>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CollectionsState {
    pub fn collection(&self, id: CollectionId) -> Option<&CollectionWithCount> {
        self.collections.iter().find(|entry| entry.id() == id)
    }

    fn collection_mut(&mut self, id: CollectionId) -> Option<&mut CollectionWithCount> {
        self.collections.iter_mut().find(|entry| entry.id() == id)
    }
}

#[derive(Clone)]
pub struct CollectionsViewModel {
    ctx: AppContext,
    state: Arc<Published<CollectionsState>>,
}

impl CollectionsViewModel {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Published::default()),
        }
    }

    pub fn state(&self) -> CollectionsState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionsState> {
        self.state.subscribe()
    }

    /// No-op when signed out.
    pub async fn load(&self) {
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        self.state.update(|state| {
            state.is_loading = true;
            state.error = None;
        });

        match fetch_collections(self.ctx.backend.as_ref(), user).await {
            Ok(collections) => {
                self.ctx.mirror_collections(&collections).await;
                self.state.update(|state| state.collections = collections);
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.state.update(|state| state.is_loading = false);
    }

    pub async fn refresh(&self) {
        self.load().await;
    }

    /// Reload collections each time a signed-in profile arrives.
    ///
    /// The task ends when the session manager is dropped.
    pub fn follow_session(&self) -> JoinHandle<()> {
        let mut profiles = self.ctx.session.subscribe_profile();
        let collections = self.clone();
        tokio::spawn(async move {
            while profiles.changed().await.is_ok() {
                let signed_in = profiles.borrow_and_update().is_some();
                if signed_in {
                    collections.load().await;
                } else {
                    collections.state.update(|state| *state = CollectionsState::default());
                }
            }
        })
    }

    /// Create a collection and put it first; returns its id.
    pub async fn create(&self, name: &str) -> Option<CollectionId> {
        let user = self.ctx.current_user()?;
        let created = match NewCollection::new(name, user) {
            Ok(new_collection) => self.ctx.backend.create_collection(new_collection).await,
            Err(error) => Err(error),
        };

        match created {
            Ok(collection) => {
                let entry = CollectionWithCount::new(collection, 0);
                let id = entry.id();
                self.ctx.mirror_collections(std::slice::from_ref(&entry)).await;
                self.state.update(|state| state.collections.insert(0, entry));
                Some(id)
            }
            Err(error) => {
                self.state.update(|state| state.error = Some(error.to_string()));
                None
            }
        }
    }

    pub async fn rename(&self, id: CollectionId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            let error = Error::InvalidInput("Collection name cannot be empty".to_string());
            self.state.update(|state| state.error = Some(error.to_string()));
            return;
        }

        let updated_at = Utc::now();
        match self.ctx.backend.rename_collection(id, name, updated_at).await {
            Ok(()) => self.state.update(|state| {
                if let Some(entry) = state.collection_mut(id) {
                    entry.collection.name = name.to_string();
                    entry.collection.updated_at = updated_at;
                }
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }

    pub async fn delete(&self, id: CollectionId) {
        match self.ctx.backend.delete_collection(id).await {
            Ok(()) => {
                if let Some(mirror) = &self.ctx.mirror {
                    if let Err(error) = mirror.forget_collection(id).await {
                        tracing::warn!("Failed to drop mirrored collection {}: {}", id, error);
                    }
                }
                self.state.update(|state| {
                    state.collections.retain(|entry| entry.id() != id);
                    if state.open_collection == Some(id) {
                        state.open_collection = None;
                        state.collection_quotes.clear();
                    }
                });
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }

    pub async fn load_collection_quotes(&self, id: CollectionId) {
        self.state.update(|state| {
            state.is_loading = true;
            state.open_collection = Some(id);
        });

        match fetch_collection_quotes(self.ctx.backend.as_ref(), id).await {
            Ok(quotes) => {
                self.ctx.mirror_quotes(&quotes).await;
                self.state.update(|state| state.collection_quotes = quotes);
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.state.update(|state| state.is_loading = false);
    }

    /// Link `quote` to `collection`; a quote already linked is left alone.
    pub async fn add_quote(&self, collection: CollectionId, quote: QuoteId) {
        match self.ctx.backend.collection_contains(collection, quote).await {
            Ok(true) => {
                tracing::debug!("Quote {} already in collection {}", quote, collection);
                return;
            }
            Ok(false) => {}
            Err(error) => {
                self.state.update(|state| state.error = Some(error.to_string()));
                return;
            }
        }

        match self.ctx.backend.add_collection_quote(collection, quote).await {
            Ok(()) => self.state.update(|state| {
                if let Some(entry) = state.collection_mut(collection) {
                    entry.record_quote_added();
                }
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }

    pub async fn remove_quote(&self, collection: CollectionId, quote: QuoteId) {
        match self
            .ctx
            .backend
            .remove_collection_quote(collection, quote)
            .await
        {
            Ok(()) => self.state.update(|state| {
                if let Some(entry) = state.collection_mut(collection) {
                    entry.record_quote_removed();
                }
                state.collection_quotes.retain(|row| row.id() != quote);
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }
}
