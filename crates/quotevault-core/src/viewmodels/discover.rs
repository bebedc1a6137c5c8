//! Discover screen: paginated, filterable, searchable quote feed.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{AppContext, Debouncer};
use crate::gateway::{QuoteQuery, DEFAULT_PAGE_SIZE};
use crate::models::{CategoryFilter, QuoteId, QuoteWithCategory};
use crate::observable::Published;
use crate::services::favorites;

/// Quiet period before a search runs
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverState {
    pub quotes: Vec<QuoteWithCategory>,
    pub categories: Vec<CategoryFilter>,
    pub selected: CategoryFilter,
    pub search_query: String,
    pub favorite_ids: HashSet<QuoteId>,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    /// Next page to fetch
    pub page: usize,
    pub error: Option<String>,
}

impl Default for DiscoverState {
    fn default() -> Self {
        Self {
            quotes: Vec::new(),
            categories: vec![CategoryFilter::all()],
            selected: CategoryFilter::all(),
            search_query: String::new(),
            favorite_ids: HashSet::new(),
            is_loading: false,
            is_loading_more: false,
            has_more: true,
            page: 0,
            error: None,
        }
    }
}

#[derive(Clone)]
pub struct DiscoverViewModel {
    ctx: AppContext,
    state: Arc<Published<DiscoverState>>,
    debouncer: Debouncer,
    page_size: usize,
}

impl DiscoverViewModel {
    pub fn new(ctx: AppContext) -> Self {
        Self::with_page_size(ctx, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(ctx: AppContext, page_size: usize) -> Self {
        Self {
            ctx,
            state: Arc::new(Published::default()),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            page_size: page_size.max(1),
        }
    }

    pub fn state(&self) -> DiscoverState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<DiscoverState> {
        self.state.subscribe()
    }

    /// Load category filters, the first page and favorite ids.
    pub async fn load_initial(&self) {
        match self.ctx.backend.list_categories().await {
            Ok(categories) => self.state.update(|state| {
                state.categories = std::iter::once(CategoryFilter::all())
                    .chain(categories.iter().map(CategoryFilter::from))
                    .collect();
            }),
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.load_quotes(true).await;
        self.load_favorite_ids().await;
    }

    /// Fetch the next page, or page 0 when `reset`.
    pub async fn load_quotes(&self, reset: bool) {
        let Some(query) = self.begin_page_load(reset) else {
            return;
        };

        match self.ctx.backend.list_quotes(&query).await {
            Ok(rows) => {
                self.ctx.mirror_quotes(&rows).await;
                let page_size = self.page_size;
                self.state.update(|state| {
                    state.has_more = rows.len() == page_size;
                    state.page += 1;
                    if reset {
                        state.quotes = rows;
                    } else {
                        state.quotes.extend(rows);
                    }
                });
            }
            Err(error) => {
                tracing::warn!("Failed to load quotes page {}: {}", query.offset, error);
                self.state.update(|state| state.error = Some(error.to_string()));
            }
        }

        self.state.update(|state| {
            state.is_loading = false;
            state.is_loading_more = false;
        });
    }

    /// Fetch the next page when `current` is the last loaded quote.
    pub async fn load_more_if_needed(&self, current: QuoteId) {
        let should_load = self.state.with(|state| {
            state.has_more
                && !state.is_loading_more
                && state.quotes.last().map(QuoteWithCategory::id) == Some(current)
        });
        if should_load {
            self.load_quotes(false).await;
        }
    }

    pub fn set_search_query(&self, query: &str) {
        let query = query.to_string();
        self.state.update_if(|state| {
            if state.search_query == query {
                return false;
            }
            state.search_query = query;
            true
        });
    }

    /// Reload from page 0 after the debounce delay.
    ///
    /// A later call supersedes this one if it arrives before the delay ends.
    pub fn search(&self) -> JoinHandle<bool> {
        let discover = self.clone();
        self.debouncer.schedule(async move {
            discover.load_quotes(true).await;
        })
    }

    pub async fn select_category(&self, filter: CategoryFilter) {
        self.state.update(|state| {
            state.selected = filter;
            state.quotes.clear();
        });
        self.load_quotes(true).await;
    }

    /// Reload page 0 and favorite ids.
    pub async fn refresh(&self) {
        self.load_quotes(true).await;
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        match self.ctx.backend.favorite_quote_ids(user).await {
            Ok(ids) => self.state.update(|state| {
                state.favorite_ids = ids.into_iter().collect();
            }),
            Err(error) => tracing::warn!("Failed to refresh favorite ids: {}", error),
        }
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

    // Marks the load in flight and returns the query, or `None` when exhausted.
    fn begin_page_load(&self, reset: bool) -> Option<QuoteQuery> {
        let page_size = self.page_size;
        let mut query = None;
        self.state.update_if(|state| {
            if reset {
                state.page = 0;
                state.has_more = true;
                state.is_loading = true;
            } else if state.has_more {
                state.is_loading_more = true;
            } else {
                return false;
            }
            state.error = None;
            query = Some(
                QuoteQuery::page(state.page, page_size)
                    .with_category(state.selected.id)
                    .with_search(&state.search_query),
            );
            true
        });
        query
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
