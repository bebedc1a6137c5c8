//! Data models for QuoteVault

mod category;
mod collection;
mod favorite;
mod id;
mod notification;
mod profile;
mod quote;
pub mod theme;

pub use category::{Category, CategoryFilter};
pub use collection::{Collection, CollectionQuote, CollectionWithCount, NewCollection};
pub use favorite::{Favorite, FavoriteWithQuote, NewFavorite};
pub use id::{CategoryId, CollectionId, CollectionQuoteId, FavoriteId, QuoteId, UserId};
pub use notification::{
    ScheduledNotification, DAILY_QUOTE_NOTIFICATION_ID, DAILY_QUOTE_NOTIFICATION_TITLE,
};
pub use profile::{Appearance, ProfileUpdate, UserProfile, DEFAULT_FONT_SIZE};
pub use quote::{ExternalQuote, Quote, QuoteWithCategory, FALLBACK_CATEGORY_NAME};
pub use theme::{AccentColor, CardStyle, ThemeMode};
