//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FavoriteId, QuoteId, QuoteWithCategory, UserId};

/// A favorite row; unique per (user, quote)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub quote_id: QuoteId,
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with its quote (`select=*,quotes(*,categories(*))`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteWithQuote {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub quote_id: QuoteId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "quotes")]
    pub quote: QuoteWithCategory,
}

/// Insert payload for a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewFavorite {
    pub user_id: UserId,
    pub quote_id: QuoteId,
}
