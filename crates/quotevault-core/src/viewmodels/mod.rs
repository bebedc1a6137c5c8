//! Feature view-models.
//!
//! Each view-model owns a [`Published`](crate::observable::Published) state
//! snapshot and mutates it only through its own operations. Gateway failures
//! become a user-facing `error` string; previously loaded data stays put.

mod collections;
mod debounce;
mod discover;
mod favorites;
mod home;
mod settings;

use std::sync::Arc;

use crate::gateway::QuoteBackend;
use crate::models::{CollectionWithCount, QuoteWithCategory, UserId};
use crate::services::MirrorStore;
use crate::session::SessionManager;

pub use collections::{CollectionsState, CollectionsViewModel};
pub use debounce::Debouncer;
pub use discover::{DiscoverState, DiscoverViewModel, SEARCH_DEBOUNCE};
pub use favorites::{FavoritesState, FavoritesViewModel};
pub use home::{greeting, HomeState, HomeViewModel, RECOMMENDED_LIMIT};
pub use settings::{SettingsState, SettingsViewModel, SAVE_CONFIRMATION};

/// Dependencies shared by every view-model.
#[derive(Clone)]
pub struct AppContext {
    pub backend: Arc<dyn QuoteBackend>,
    pub session: SessionManager,
    pub mirror: Option<MirrorStore>,
}

impl AppContext {
    pub fn new(backend: Arc<dyn QuoteBackend>, session: SessionManager) -> Self {
        Self {
            backend,
            session,
            mirror: None,
        }
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: MirrorStore) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub(crate) fn current_user(&self) -> Option<UserId> {
        self.session.current_user_id()
    }

    // Mirror writes never fail the calling operation.
    pub(crate) async fn mirror_quotes(&self, quotes: &[QuoteWithCategory]) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        if let Err(error) = mirror.record_quotes(quotes).await {
            tracing::warn!("Failed to mirror {} quotes: {}", quotes.len(), error);
        }
    }

    pub(crate) async fn mirror_collections(&self, collections: &[CollectionWithCount]) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        if let Err(error) = mirror.record_collections(collections).await {
            tracing::warn!(
                "Failed to mirror {} collections: {}",
                collections.len(),
                error
            );
        }
    }
}
