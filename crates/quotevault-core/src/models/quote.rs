//! Quote model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, CategoryId, QuoteId};

/// Category name reported for quotes without a joined category
pub const FALLBACK_CATEGORY_NAME: &str = "General";

/// A quote row as stored remotely
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub author: String,
    pub author_image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_quote_of_day: bool,
    /// Date this quote was featured, `YYYY-MM-DD`
    pub quote_of_day_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A quote joined with its category (`select=*,categories(*)`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteWithCategory {
    #[serde(flatten)]
    pub quote: Quote,
    #[serde(rename = "categories", default)]
    pub category: Option<Category>,
}

impl QuoteWithCategory {
    #[must_use]
    pub const fn id(&self) -> QuoteId {
        self.quote.id
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or(FALLBACK_CATEGORY_NAME, |category| category.name.as_str())
    }

    /// Whether this quote is the featured quote for `date`
    #[must_use]
    pub fn is_quote_of_day_for(&self, date: NaiveDate) -> bool {
        self.quote.quote_of_day_date == Some(date)
    }
}

/// A quote returned by the third-party random quote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalQuote {
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub category: String,
}
