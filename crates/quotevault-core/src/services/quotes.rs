//! Quote-of-the-day selection.

use chrono::NaiveDate;

use crate::gateway::QuoteBackend;
use crate::models::QuoteWithCategory;
use crate::Result;

/// Quote featured on `today`, assigning one if none is yet.
///
/// An unfeatured quote is claimed by stamping it with today's date. Two
/// clients racing on the first request of a day may both claim one; the
/// later lookup returns whichever row the server finds first. When every
/// quote has been featured before, any quote is returned unchanged.
pub async fn quote_of_day(
    backend: &dyn QuoteBackend,
    today: NaiveDate,
) -> Result<Option<QuoteWithCategory>> {
    if let Some(quote) = backend.quote_for_date(today).await? {
        return Ok(Some(quote));
    }

    if let Some(mut quote) = backend.first_unassigned_quote().await? {
        backend.mark_quote_of_day(quote.id(), today).await?;
        tracing::info!(quote_id = %quote.id(), %today, "Assigned quote of the day");
        quote.quote.quote_of_day_date = Some(today);
        quote.quote.is_quote_of_day = true;
        return Ok(Some(quote));
    }

    backend.first_quote().await
}
