//! Quote list query builder

use crate::models::CategoryId;

/// Number of rows per Discover page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Row ordering for quote listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteOrder {
    /// `created_at` descending
    #[default]
    Newest,
    /// `likes_count` descending
    MostLiked,
}

impl QuoteOrder {
    const fn as_param(self) -> &'static str {
        match self {
            Self::Newest => "created_at.desc",
            Self::MostLiked => "likes_count.desc",
        }
    }
}

/// Filter, order and range for a quote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteQuery {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub order: QuoteOrder,
    pub offset: usize,
    pub limit: usize,
}

impl Default for QuoteQuery {
    fn default() -> Self {
        Self::page(0, DEFAULT_PAGE_SIZE)
    }
}

impl QuoteQuery {
    /// Zero-based page of `page_size` rows
    #[must_use]
    pub const fn page(page: usize, page_size: usize) -> Self {
        Self {
            category: None,
            search: None,
            order: QuoteOrder::Newest,
            offset: page * page_size,
            limit: page_size,
        }
    }

    /// Top `limit` quotes by likes
    #[must_use]
    pub const fn most_liked(limit: usize) -> Self {
        Self {
            category: None,
            search: None,
            order: QuoteOrder::MostLiked,
            offset: 0,
            limit,
        }
    }

    #[must_use]
    pub const fn with_category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }

    /// Blank terms are dropped
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        let term = sanitize_search_term(term);
        self.search = if term.is_empty() { None } else { Some(term) };
        self
    }

    /// PostgREST query parameters for `GET /quotes`
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), QUOTE_SELECT.to_string())];
        if let Some(category) = self.category {
            pairs.push(("category_id".to_string(), format!("eq.{category}")));
        }
        if let Some(term) = &self.search {
            pairs.push((
                "or".to_string(),
                format!("(text.ilike.*{term}*,author.ilike.*{term}*)"),
            ));
        }
        pairs.push(("order".to_string(), self.order.as_param().to_string()));
        pairs.push(("offset".to_string(), self.offset.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}

/// Embedded select for quotes joined with their category
pub(crate) const QUOTE_SELECT: &str = "*,categories(*)";

// Reserved characters in PostgREST logic trees would split the `or` filter.
fn sanitize_search_term(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|character| !matches!(character, ',' | '(' | ')' | '*' | '%' | '"' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}
