//! Home screen: quote of the day, categories and recommendations.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use tokio::sync::watch;

use super::AppContext;
use crate::gateway::QuoteQuery;
use crate::models::{Category, CategoryId, QuoteId, QuoteWithCategory};
use crate::observable::Published;
use crate::services::{favorites, quotes};

/// Number of recommended quotes shown on Home
pub const RECOMMENDED_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeState {
    pub quote_of_day: Option<QuoteWithCategory>,
    pub categories: Vec<Category>,
    pub recommended: Vec<QuoteWithCategory>,
    pub favorite_ids: HashSet<QuoteId>,
    pub selected_category: Option<CategoryId>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Time-of-day greeting for a local hour (0-23)
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        17..=21 => "Good Evening",
        _ => "Good Night",
    }
}

#[derive(Clone)]
pub struct HomeViewModel {
    ctx: AppContext,
    state: Arc<Published<HomeState>>,
}

impl HomeViewModel {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Published::default()),
        }
    }

    pub fn state(&self) -> HomeState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    /// Fetch quote of the day, categories and recommendations together.
    pub async fn load(&self, today: NaiveDate) {
        self.state.update(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let backend = self.ctx.backend.as_ref();
        let recommended_query = QuoteQuery::most_liked(RECOMMENDED_LIMIT);
        let loaded = tokio::try_join!(
            quotes::quote_of_day(backend, today),
            backend.list_categories(),
            backend.list_quotes(&recommended_query),
        );

        match loaded {
            Ok((quote_of_day, categories, recommended)) => {
                self.ctx.mirror_quotes(&recommended).await;
                if let Some(quote) = &quote_of_day {
                    self.ctx.mirror_quotes(std::slice::from_ref(quote)).await;
                }
                self.state.update(|state| {
                    state.quote_of_day = quote_of_day;
                    state.categories = categories;
                    state.recommended = recommended;
                });
                self.load_favorite_ids().await;
            }
            Err(error) => {
                tracing::warn!("Failed to load home: {}", error);
                self.state.update(|state| state.error = Some(error.to_string()));
            }
        }

        self.state.update(|state| state.is_loading = false);
    }

    pub async fn refresh(&self, today: NaiveDate) {
        self.load(today).await;
    }

    /// Reload recommendations restricted to one category (`None` for all).
    pub async fn select_category(&self, category: Option<CategoryId>) {
        self.state.update(|state| {
            state.selected_category = category;
            state.is_loading = true;
        });

        let query = QuoteQuery::page(0, RECOMMENDED_LIMIT).with_category(category);
        match self.ctx.backend.list_quotes(&query).await {
            Ok(recommended) => {
                self.ctx.mirror_quotes(&recommended).await;
                self.state.update(|state| state.recommended = recommended);
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.state.update(|state| state.is_loading = false);
    }

    /// No-op when signed out.
    pub async fn toggle_favorite(&self, quote: QuoteId) {
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        match favorites::toggle_favorite(self.ctx.backend.as_ref(), user, quote).await {
            Ok(true) => self.state.update(|state| {
                state.favorite_ids.insert(quote);
            }),
            Ok(false) => self.state.update(|state| {
                state.favorite_ids.remove(&quote);
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }

    pub fn is_favorited(&self, quote: QuoteId) -> bool {
        self.state.with(|state| state.favorite_ids.contains(&quote))
    }

    /// Greeting for the current local time
    pub fn greeting_now(&self) -> &'static str {
        greeting(chrono::Local::now().hour())
    }

    pub fn display_name(&self) -> String {
        self.ctx
            .session
            .profile()
            .and_then(|profile| profile.display_name)
            .unwrap_or_else(|| "User".to_string())
    }

    async fn load_favorite_ids(&self) {
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        match self.ctx.backend.favorite_quote_ids(user).await {
            Ok(ids) => self.state.update(|state| {
                state.favorite_ids = ids.into_iter().collect();
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }
    }
}
