//! Favorites screen.

use std::sync::Arc;

use tokio::sync::watch;

use super::AppContext;
use crate::models::{FavoriteWithQuote, QuoteId, QuoteWithCategory};
use crate::observable::Published;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesState {
    /// Newest favorite first
    pub favorites: Vec<FavoriteWithQuote>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct FavoritesViewModel {
    ctx: AppContext,
    state: Arc<Published<FavoritesState>>,
}

impl FavoritesViewModel {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Published::default()),
        }
    }

    pub fn state(&self) -> FavoritesState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
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

        match self.ctx.backend.list_favorites(user).await {
            Ok(favorites) => {
                let quotes: Vec<QuoteWithCategory> = favorites
                    .iter()
                    .map(|favorite| favorite.quote.clone())
                    .collect();
                self.ctx.mirror_quotes(&quotes).await;
                self.state.update(|state| state.favorites = favorites);
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.state.update(|state| state.is_loading = false);
    }

    pub async fn refresh(&self) {
        self.load().await;
    }

    /// Unfavorite `quote`; the row disappears once the server confirms.
    pub async fn remove(&self, quote: QuoteId) {
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        match self.ctx.backend.remove_favorite(user, quote).await {
            Ok(()) => self.state.update(|state| {
                state.favorites.retain(|favorite| favorite.quote_id != quote);
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::services::favorites::toggle_favorite;
    use crate::viewmodels::testing::{fixture, signed_in};

    #[tokio::test]
    async fn load_lists_newest_favorite_first() {
        let fixture = signed_in().await;
        let ids = fixture.backend.quote_ids();
        for quote in [ids[4], ids[9]] {
            toggle_favorite(fixture.backend.as_ref(), fixture.auth.user_id, quote)
                .await
                .unwrap();
        }
        let favorites = FavoritesViewModel::new(fixture.ctx);

        favorites.load().await;

        let state = favorites.state();
        assert_eq!(
            state
                .favorites
                .iter()
                .map(|favorite| favorite.quote_id)
                .collect::<Vec<_>>(),
            vec![ids[9], ids[4]]
        );
        assert_eq!(state.favorites[0].quote.id(), ids[9]);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn remove_drops_the_row_after_success() {
        let fixture = signed_in().await;
        let quote = fixture.backend.quote_ids()[1];
        toggle_favorite(fixture.backend.as_ref(), fixture.auth.user_id, quote)
            .await
            .unwrap();
        let favorites = FavoritesViewModel::new(fixture.ctx);
        favorites.load().await;

        favorites.remove(quote).await;

        assert!(favorites.state().favorites.is_empty());
        assert_eq!(fixture.backend.favorite_rows(fixture.auth.user_id, quote), 0);
    }

    #[tokio::test]
    async fn failed_remove_keeps_the_row() {
        let fixture = signed_in().await;
        let quote = fixture.backend.quote_ids()[1];
        toggle_favorite(fixture.backend.as_ref(), fixture.auth.user_id, quote)
            .await
            .unwrap();
        let favorites = FavoritesViewModel::new(fixture.ctx);
        favorites.load().await;

        fixture.backend.set_failing(true);
        favorites.remove(quote).await;

        let state = favorites.state();
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Service unavailable (503)"));
    }

    #[tokio::test]
    async fn signed_out_load_does_nothing() {
        let fixture = fixture();
        let backend = fixture.backend.clone();
        let favorites = FavoritesViewModel::new(fixture.ctx);

        backend.set_failing(true);
        favorites.refresh().await;

        assert_eq!(favorites.state(), FavoritesState::default());
    }
}
