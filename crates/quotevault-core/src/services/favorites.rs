//! Favorite toggling.

use crate::gateway::QuoteBackend;
use crate::models::{NewFavorite, QuoteId, UserId};
use crate::Result;

/// Flip the favorite state of `quote` for `user`.
///
/// Returns `true` when the quote is now a favorite.
pub async fn toggle_favorite(
    backend: &dyn QuoteBackend,
    user: UserId,
    quote: QuoteId,
) -> Result<bool> {
    if backend.is_favorited(user, quote).await? {
        backend.remove_favorite(user, quote).await?;
        Ok(false)
    } else {
        backend
            .add_favorite(NewFavorite {
                user_id: user,
                quote_id: quote,
            })
            .await?;
        Ok(true)
    }
}
