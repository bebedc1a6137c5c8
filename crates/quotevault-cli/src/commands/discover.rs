use quotevault_core::gateway::DEFAULT_PAGE_SIZE;
use quotevault_core::models::QuoteWithCategory;
use quotevault_core::viewmodels::DiscoverViewModel;

use super::common::{check_error, format_quote_line, QuoteListItem, Runtime};
use crate::error::CliError;

/// Mirrored rows scanned by an offline listing before filtering
const OFFLINE_SCAN_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct DiscoverRequest<'a> {
    pub category: Option<&'a str>,
    pub search: Option<&'a str>,
    pub pages: usize,
    pub json: bool,
}

impl DiscoverRequest<'_> {
    fn limit(&self) -> usize {
        self.pages.max(1) * DEFAULT_PAGE_SIZE
    }
}

pub async fn run_discover(
    runtime: &Runtime,
    request: &DiscoverRequest<'_>,
) -> Result<(), CliError> {
    let discover = DiscoverViewModel::new(runtime.ctx.clone());
    if let Some(query) = request.search {
        discover.set_search_query(query);
    }
    discover.load_initial().await;
    check_error(discover.state().error)?;

    if let Some(name) = request.category {
        let filter = discover
            .state()
            .categories
            .into_iter()
            .find(|filter| !filter.is_all() && filter.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CliError::UnknownCategory(name.trim().to_string()))?;
        discover.select_category(filter).await;
        check_error(discover.state().error)?;
    }

    for _ in 1..request.pages.max(1) {
        let Some(last) = discover.state().quotes.last().map(|quote| quote.id()) else {
            break;
        };
        discover.load_more_if_needed(last).await;
        check_error(discover.state().error)?;
        if !discover.state().has_more {
            break;
        }
    }

    let state = discover.state();
    print_quotes(
        &state.quotes,
        |quote| state.favorite_ids.contains(&quote.id()),
        request.json,
    )?;
    if !request.json && state.has_more {
        println!("(more available: pass --pages {})", state.page + 1);
    }
    Ok(())
}

/// List quotes from the local mirror without contacting the server.
pub async fn run_discover_offline(
    runtime: &Runtime,
    request: &DiscoverRequest<'_>,
) -> Result<(), CliError> {
    let cached = runtime.mirror.cached_quotes(OFFLINE_SCAN_LIMIT).await?;
    let quotes = filter_cached_quotes(cached, request.category, request.search, request.limit());
    tracing::debug!(count = quotes.len(), "Listing mirrored quotes");
    print_quotes(&quotes, |_| false, request.json)
}

/// Narrow mirrored quotes the way the server filters: category by name,
/// search as a case-insensitive match on text or author.
pub fn filter_cached_quotes(
    quotes: Vec<QuoteWithCategory>,
    category: Option<&str>,
    search: Option<&str>,
    limit: usize,
) -> Vec<QuoteWithCategory> {
    let category = category.map(str::trim).filter(|name| !name.is_empty());
    let search = search
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty());

    quotes
        .into_iter()
        .filter(|quote| {
            category.map_or(true, |name| quote.category_name().eq_ignore_ascii_case(name))
        })
        .filter(|quote| {
            search.as_deref().map_or(true, |term| {
                quote.quote.text.to_lowercase().contains(term)
                    || quote.quote.author.to_lowercase().contains(term)
            })
        })
        .take(limit)
        .collect()
}

fn print_quotes(
    quotes: &[QuoteWithCategory],
    favorited: impl Fn(&QuoteWithCategory) -> bool,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let items: Vec<QuoteListItem> = quotes
            .iter()
            .map(|quote| QuoteListItem::new(quote, favorited(quote)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes found.");
    }
    for quote in quotes {
        println!("{}", format_quote_line(quote, favorited(quote)));
    }
    Ok(())
}
