use quotevault_core::gateway::QuotesApiClient;

use super::common::{resolve_client_config, GlobalOptions};
use crate::error::CliError;

/// Needs only the quote API settings, not a Supabase project.
pub async fn run_random(options: &GlobalOptions, category: Option<&str>) -> Result<(), CliError> {
    let (_, layered) = resolve_client_config(options)?;
    let api_key = layered.quotes_api_key.clone().ok_or_else(|| {
        CliError::Config(
            "quotes_api_key is required (set QUOTEVAULT_QUOTES_API_KEY or `quotevault config init --quotes-api-key`)"
                .to_string(),
        )
    })?;
    let base_url = layered
        .quotes_api_url
        .unwrap_or_else(|| quotevault_core::gateway::DEFAULT_QUOTES_API_URL.to_string());

    let client = QuotesApiClient::new(base_url, api_key)?;
    let quote = client.random_quote(category).await?;
    println!("\"{}\"", quote.quote);
    println!("  — {}", quote.author);
    if !quote.category.is_empty() {
        println!("  [{}]", quote.category);
    }
    Ok(())
}
